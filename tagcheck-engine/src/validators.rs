// Built-in validators

use crate::{FieldValue, Kind, Number};
use std::cmp::Ordering;
use once_cell::sync::Lazy;
use regex::Regex;

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").unwrap());

/// Why a built-in rule could not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mismatch {
    /// The rule does not apply to values of this kind
    Kind(Kind),
    /// The rule parameter cannot be read for this kind
    Param,
}

/// Built-in rules, compiled from their tag and parameter
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Builtin {
    Required,
    Len(Number),
    Min(Number),
    Max(Number),
    Gt(Number),
    Gte(Number),
    Lt(Number),
    Lte(Number),
    Eq(Comparand),
    Ne(Comparand),
    OneOf(Vec<String>),
    Email,
    Url,
    Uuid,
    Alpha,
    Alphanum,
    Numeric,
    Contains(String),
    StartsWith(String),
    EndsWith(String),
}

/// Parameter of `eq`/`ne`: compared as text for strings, as a number otherwise
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Comparand {
    raw: String,
    number: Option<Number>,
}

impl Comparand {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            number: Number::parse(raw),
        }
    }

    fn matches(&self, value: &FieldValue<'_>) -> Result<bool, Mismatch> {
        match value {
            FieldValue::Str(s) => Ok(*s == self.raw),
            FieldValue::Bool(b) => self
                .raw
                .parse::<bool>()
                .map(|expected| expected == *b)
                .map_err(|_| Mismatch::Param),
            _ => {
                let expected = self.number.ok_or(Mismatch::Param)?;
                Ok(measure(value)? == expected)
            }
        }
    }
}

/// Error returned when a tag names a built-in but its parameter is unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BadParam;

impl Builtin {
    /// Look up a built-in rule by tag. `Ok(None)` means the tag is not built in.
    pub(crate) fn parse(tag: &str, param: &str) -> Result<Option<Self>, BadParam> {
        let builtin = match tag {
            "required" => Builtin::Required,
            "len" => Builtin::Len(number(param)?),
            "min" => Builtin::Min(number(param)?),
            "max" => Builtin::Max(number(param)?),
            "gt" => Builtin::Gt(number(param)?),
            "gte" => Builtin::Gte(number(param)?),
            "lt" => Builtin::Lt(number(param)?),
            "lte" => Builtin::Lte(number(param)?),
            "eq" => Builtin::Eq(Comparand::new(param)),
            "ne" => Builtin::Ne(Comparand::new(param)),
            "oneof" => {
                let options: Vec<String> = param.split_whitespace().map(str::to_string).collect();
                if options.is_empty() {
                    return Err(BadParam);
                }
                Builtin::OneOf(options)
            }
            "email" => Builtin::Email,
            "url" => Builtin::Url,
            "uuid" => Builtin::Uuid,
            "alpha" => Builtin::Alpha,
            "alphanum" => Builtin::Alphanum,
            "numeric" => Builtin::Numeric,
            "contains" => Builtin::Contains(non_empty(param)?),
            "startswith" => Builtin::StartsWith(non_empty(param)?),
            "endswith" => Builtin::EndsWith(non_empty(param)?),
            _ => return Ok(None),
        };
        Ok(Some(builtin))
    }

    /// Evaluate the rule; `Ok(true)` when the value passes
    pub(crate) fn check(&self, value: &FieldValue<'_>) -> Result<bool, Mismatch> {
        match self {
            Builtin::Required => Ok(!value.is_zero()),
            Builtin::Len(n) => compare(value, n).map(|o| o == Some(Ordering::Equal)),
            Builtin::Min(n) | Builtin::Gte(n) => {
                compare(value, n).map(|o| matches!(o, Some(Ordering::Greater | Ordering::Equal)))
            }
            Builtin::Max(n) | Builtin::Lte(n) => {
                compare(value, n).map(|o| matches!(o, Some(Ordering::Less | Ordering::Equal)))
            }
            Builtin::Gt(n) => compare(value, n).map(|o| o == Some(Ordering::Greater)),
            Builtin::Lt(n) => compare(value, n).map(|o| o == Some(Ordering::Less)),
            Builtin::Eq(c) => c.matches(value),
            Builtin::Ne(c) => c.matches(value).map(|eq| !eq),
            Builtin::OneOf(options) => match value {
                FieldValue::Str(_) | FieldValue::Int(_) | FieldValue::UInt(_) => {
                    let rendered = value.render().unwrap_or_default();
                    Ok(options.iter().any(|o| *o == rendered))
                }
                other => Err(Mismatch::Kind(other.kind())),
            },
            Builtin::Email => text(value).map(|s| EMAIL_REGEX.is_match(s)),
            Builtin::Url => text(value).map(|s| URL_REGEX.is_match(s)),
            Builtin::Uuid => text(value).map(|s| UUID_REGEX.is_match(s)),
            Builtin::Alpha => text(value).map(|s| ALPHA_REGEX.is_match(s)),
            Builtin::Alphanum => text(value).map(|s| ALPHANUMERIC_REGEX.is_match(s)),
            Builtin::Numeric => text(value).map(|s| NUMERIC_REGEX.is_match(s)),
            Builtin::Contains(needle) => text(value).map(|s| s.contains(needle.as_str())),
            Builtin::StartsWith(prefix) => text(value).map(|s| s.starts_with(prefix.as_str())),
            Builtin::EndsWith(suffix) => text(value).map(|s| s.ends_with(suffix.as_str())),
        }
    }
}

fn number(param: &str) -> Result<Number, BadParam> {
    Number::parse(param).ok_or(BadParam)
}

fn non_empty(param: &str) -> Result<String, BadParam> {
    if param.is_empty() {
        Err(BadParam)
    } else {
        Ok(param.to_string())
    }
}

fn measure(value: &FieldValue<'_>) -> Result<Number, Mismatch> {
    value.measure().ok_or(Mismatch::Kind(value.kind()))
}

/// `None` when either side is NaN
fn compare(value: &FieldValue<'_>, bound: &Number) -> Result<Option<Ordering>, Mismatch> {
    Ok(measure(value)?.partial_cmp(bound))
}

fn text<'a>(value: &FieldValue<'a>) -> Result<&'a str, Mismatch> {
    value.as_str().ok_or(Mismatch::Kind(value.kind()))
}
