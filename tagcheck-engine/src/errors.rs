// Validation errors

use crate::Kind;
use std::fmt;
use thiserror::Error;

/// A single rule failure on a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Reported field name, as produced by the tag name function
    pub field: String,

    /// Declared field identifier
    pub struct_field: &'static str,

    /// `Struct.field`, using the reported name
    pub namespace: String,

    /// Rule tag that failed (`a|b` for alternatives)
    pub tag: String,

    /// Rule parameter, empty when the rule takes none
    pub param: String,

    /// Value that failed validation (scalars only)
    pub value: Option<String>,

    /// Kind of the failing value
    pub kind: Kind,
}

impl FieldViolation {
    /// Create a new violation
    pub fn new(
        field: impl Into<String>,
        struct_field: &'static str,
        tag: impl Into<String>,
        kind: Kind,
    ) -> Self {
        let field = field.into();
        Self {
            namespace: field.clone(),
            field,
            struct_field,
            tag: tag.into(),
            param: String::new(),
            value: None,
            kind,
        }
    }

    /// Set the rule parameter
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Set the invalid value
    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    /// Prefix the namespace with the struct name
    pub fn in_struct(mut self, struct_name: &str) -> Self {
        self.namespace = format!("{}.{}", struct_name, self.field);
        self
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field validation for '{}' failed on the '{}' rule",
            self.namespace, self.tag
        )
    }
}

impl std::error::Error for FieldViolation {}

/// Collection of rule violations, in the order they were found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Create a new validation errors collection
    pub fn new(errors: Vec<FieldViolation>) -> Self {
        Self { errors }
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add an error
    pub fn add(&mut self, error: FieldViolation) {
        self.errors.push(error);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldViolation> {
        self.errors.iter()
    }

    /// Get errors for a specific reported field name
    pub fn get_field_errors(&self, field: &str) -> Vec<&FieldViolation> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "namespace": e.namespace,
                    "tag": e.tag,
                    "param": e.param,
                    "value": e.value,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<FieldViolation>> for ValidationErrors {
    fn from(errors: Vec<FieldViolation>) -> Self {
        Self::new(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldViolation;
    type IntoIter = std::vec::IntoIter<FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Errors returned by struct validation
///
/// Only [`EngineError::Violations`] describes bad data. Every other variant
/// is a usage error in the rule tags themselves.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("validation failed:\n{0}")]
    Violations(ValidationErrors),

    #[error("undefined validation rule '{tag}' on field '{field}'")]
    UndefinedRule { field: String, tag: String },

    #[error("invalid rule tag '{rules}' on field '{field}': {reason}")]
    InvalidTag {
        field: String,
        rules: String,
        reason: String,
    },

    #[error("invalid parameter '{param}' for rule '{tag}' on field '{field}'")]
    InvalidParam {
        field: String,
        tag: String,
        param: String,
    },

    #[error("rule '{tag}' cannot be applied to field '{field}' of kind {kind}")]
    UnsupportedKind {
        field: String,
        tag: String,
        kind: Kind,
    },
}

impl EngineError {
    /// The violations collection, if this error describes bad data
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            EngineError::Violations(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for EngineError {
    fn from(errors: ValidationErrors) -> Self {
        EngineError::Violations(errors)
    }
}

/// Errors returned when registering a custom rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("rule tag cannot be empty")]
    EmptyTag,

    #[error("rule tag '{0}' is reserved or contains restricted characters")]
    ReservedTag(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(field: &str, tag: &str) -> FieldViolation {
        FieldViolation::new(field, "ident", tag, Kind::String)
    }

    #[test]
    fn test_namespace_uses_struct_name() {
        let v = violation("email", "required").in_struct("User");
        assert_eq!(v.namespace, "User.email");
        assert_eq!(
            v.to_string(),
            "field validation for 'User.email' failed on the 'required' rule"
        );
    }

    #[test]
    fn test_get_field_errors() {
        let errors = ValidationErrors::new(vec![
            violation("name", "required"),
            violation("email", "email"),
            violation("name", "min"),
        ]);

        assert_eq!(errors.len(), 3);
        let name_errors = errors.get_field_errors("name");
        assert_eq!(name_errors.len(), 2);
        assert_eq!(name_errors[1].tag, "min");
    }

    #[test]
    fn test_to_json() {
        let errors = ValidationErrors::new(vec![
            violation("age", "min")
                .with_param("18")
                .with_value(Some("3".to_string())),
        ]);
        let json = errors.to_json();
        assert_eq!(json["errors"][0]["field"], "age");
        assert_eq!(json["errors"][0]["param"], "18");
        assert_eq!(json["errors"][0]["value"], "3");
    }

    #[test]
    fn test_engine_error_violations_accessor() {
        let err = EngineError::from(ValidationErrors::new(vec![violation("a", "required")]));
        assert_eq!(err.violations().map(|v| v.len()), Some(1));

        let err = EngineError::UndefinedRule {
            field: "User.a".to_string(),
            tag: "nope".to_string(),
        };
        assert!(err.violations().is_none());
    }
}
