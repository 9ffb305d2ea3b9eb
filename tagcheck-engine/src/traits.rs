// Validation traits

use crate::{AsFieldValue, FieldValue};
use std::sync::Arc;

/// Serialization name declared for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerdeName {
    /// The field serializes under this name
    Named(&'static str),
    /// The field is skipped by serialization
    Skipped,
}

/// Static metadata for one validated struct field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Declared field identifier
    pub ident: &'static str,

    /// Serialization name, when the struct declares one
    pub serde: Option<SerdeName>,

    /// Comma-separated rule tag, e.g. `required,min=3`
    pub rules: &'static str,
}

impl FieldMeta {
    pub const fn new(ident: &'static str, rules: &'static str) -> Self {
        Self {
            ident,
            serde: None,
            rules,
        }
    }

    pub const fn with_serde(mut self, serde: SerdeName) -> Self {
        self.serde = Some(serde);
        self
    }

    /// Field identifier without a raw-identifier prefix
    pub fn ident(&self) -> &'static str {
        self.ident.strip_prefix("r#").unwrap_or(self.ident)
    }
}

/// A field of a value under validation
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub meta: &'static FieldMeta,
    pub value: FieldValue<'a>,
    /// `Some(is_some)` for `Option` fields, `None` for everything else
    pub present: Option<bool>,
}

impl<'a> Field<'a> {
    pub fn new<T: AsFieldValue + ?Sized>(meta: &'static FieldMeta, value: &'a T) -> Self {
        Self {
            meta,
            value: value.as_field_value(),
            present: value.presence(),
        }
    }

    /// Whether `required` fails and `omitempty` skips this field.
    ///
    /// An `Option` is empty only when it is `None`; `Some(0)` holds a value.
    pub fn is_empty(&self) -> bool {
        match self.present {
            Some(present) => !present,
            None => self.value.is_zero(),
        }
    }
}

/// Trait for types the engine can validate
///
/// Usually derived with `#[derive(Validate)]`, which binds each field's
/// `#[validate("...")]` tag and serde name at compile time.
pub trait Validate {
    /// Name used as the namespace prefix in violations
    fn struct_name(&self) -> &'static str;

    /// Fields carrying validation rules, in declaration order
    fn fields(&self) -> Vec<Field<'_>>;
}

impl<T: Validate + ?Sized> Validate for &T {
    fn struct_name(&self) -> &'static str {
        (**self).struct_name()
    }

    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

impl<T: Validate + ?Sized> Validate for Box<T> {
    fn struct_name(&self) -> &'static str {
        (**self).struct_name()
    }

    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

/// Context handed to a rule handler
#[derive(Debug, Clone, Copy)]
pub struct FieldLevel<'a> {
    value: FieldValue<'a>,
    param: &'a str,
    meta: &'a FieldMeta,
    struct_name: &'a str,
}

impl<'a> FieldLevel<'a> {
    pub fn new(
        value: FieldValue<'a>,
        param: &'a str,
        meta: &'a FieldMeta,
        struct_name: &'a str,
    ) -> Self {
        Self {
            value,
            param,
            meta,
            struct_name,
        }
    }

    /// Value being validated
    pub fn value(&self) -> FieldValue<'a> {
        self.value
    }

    /// Rule parameter (the part after `=`), empty when absent
    pub fn param(&self) -> &'a str {
        self.param
    }

    pub fn field(&self) -> &'a FieldMeta {
        self.meta
    }

    pub fn struct_name(&self) -> &'a str {
        self.struct_name
    }
}

/// Rule handler: returns `true` when the value passes
pub type RuleFn = Arc<dyn Fn(&FieldLevel<'_>) -> bool + Send + Sync>;

/// Maps field metadata to the name reported in violations
pub type TagNameFn = Arc<dyn Fn(&FieldMeta) -> String + Send + Sync>;

/// Default reported name: the field identifier
pub fn default_field_name(meta: &FieldMeta) -> String {
    meta.ident().to_string()
}
