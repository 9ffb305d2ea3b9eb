// Field value model

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Borrowed view of a struct field's value, as seen by validation rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Collection, represented by its length
    Seq(usize),
    /// `Option::None`
    Nil,
    /// A value the built-in rules cannot inspect
    Opaque,
}

/// A measured size or a numeric rule parameter.
///
/// Integers compare exactly; a float on either side compares as `f64`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    /// Parse a rule parameter, preferring an exact integer
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        raw.parse::<i128>()
            .map(Number::Int)
            .ok()
            .or_else(|| raw.parse::<f64>().ok().map(Number::Float))
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

/// Kind of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Int,
    UInt,
    Float,
    Bool,
    Collection,
    Nil,
    Opaque,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Int => "int",
            Kind::UInt => "uint",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Collection => "collection",
            Kind::Nil => "nil",
            Kind::Opaque => "opaque",
        }
    }

    /// Whether values of this kind compare by numeric value
    pub fn is_number(&self) -> bool {
        matches!(self, Kind::Int | Kind::UInt | Kind::Float)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> FieldValue<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            FieldValue::Str(_) => Kind::String,
            FieldValue::Int(_) => Kind::Int,
            FieldValue::UInt(_) => Kind::UInt,
            FieldValue::Float(_) => Kind::Float,
            FieldValue::Bool(_) => Kind::Bool,
            FieldValue::Seq(_) => Kind::Collection,
            FieldValue::Nil => Kind::Nil,
            FieldValue::Opaque => Kind::Opaque,
        }
    }

    /// Whether the value is the zero value of its kind.
    ///
    /// Opaque values are never zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Int(n) => n == 0,
            FieldValue::UInt(n) => n == 0,
            FieldValue::Float(n) => n == 0.0,
            FieldValue::Bool(b) => !b,
            FieldValue::Seq(len) => len == 0,
            FieldValue::Nil => true,
            FieldValue::Opaque => false,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Size used by length and range rules: character count for strings,
    /// item count for collections, the number itself for numbers.
    pub fn measure(&self) -> Option<Number> {
        match *self {
            FieldValue::Str(s) => Some(Number::Int(s.chars().count() as i128)),
            FieldValue::Seq(len) => Some(Number::Int(len as i128)),
            FieldValue::Int(n) => Some(Number::Int(i128::from(n))),
            FieldValue::UInt(n) => Some(Number::Int(i128::from(n))),
            FieldValue::Float(n) => Some(Number::Float(n)),
            FieldValue::Bool(_) | FieldValue::Nil | FieldValue::Opaque => None,
        }
    }

    /// Render the value for error reporting
    pub fn render(&self) -> Option<String> {
        match *self {
            FieldValue::Str(s) => Some(s.to_string()),
            FieldValue::Int(n) => Some(n.to_string()),
            FieldValue::UInt(n) => Some(n.to_string()),
            FieldValue::Float(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Seq(_) | FieldValue::Nil | FieldValue::Opaque => None,
        }
    }
}

/// Conversion of a field into a [`FieldValue`]
///
/// Implemented for the std scalar, string and collection types. Types that
/// only carry custom rules can implement it by returning
/// [`FieldValue::Opaque`].
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;

    /// `Some(is_some)` for optional values, `None` when the type is always
    /// present
    fn presence(&self) -> Option<bool> {
        None
    }
}


macro_rules! signed_field_value {
    ($($t:ty),*) => {
        $(impl AsFieldValue for $t {
            fn as_field_value(&self) -> FieldValue<'_> {
                FieldValue::Int(*self as i64)
            }
        })*
    };
}

macro_rules! unsigned_field_value {
    ($($t:ty),*) => {
        $(impl AsFieldValue for $t {
            fn as_field_value(&self) -> FieldValue<'_> {
                FieldValue::UInt(*self as u64)
            }
        })*
    };
}

signed_field_value!(i8, i16, i32, i64, isize);
unsigned_field_value!(u8, u16, u32, u64, usize);

impl AsFieldValue for f32 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(f64::from(*self))
    }
}

impl AsFieldValue for f64 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(*self)
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self.as_str())
    }
}

impl AsFieldValue for Cow<'_, str> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self.as_ref())
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value(),
            None => FieldValue::Nil,
        }
    }

    fn presence(&self) -> Option<bool> {
        Some(self.is_some())
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }

    fn presence(&self) -> Option<bool> {
        (**self).presence()
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }

    fn presence(&self) -> Option<bool> {
        (**self).presence()
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Arc<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }

    fn presence(&self) -> Option<bool> {
        (**self).presence()
    }
}

impl<T> AsFieldValue for [T] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T, const N: usize> AsFieldValue for [T; N] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(N)
    }
}

impl<T> AsFieldValue for Vec<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T> AsFieldValue for VecDeque<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T, S> AsFieldValue for HashSet<T, S> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T> AsFieldValue for BTreeSet<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<K, V, S> AsFieldValue for HashMap<K, V, S> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<K, V> AsFieldValue for BTreeMap<K, V> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}
