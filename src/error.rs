// Error types for tagcheck

use crate::ViolationMap;
use tagcheck_engine::{EngineError, RegistrationError, ValidationErrors};
use thiserror::Error;

/// Error returned by a validation check
#[derive(Error, Debug, Clone)]
pub enum CheckError {
    /// The value broke one or more rules.
    ///
    /// `fields` maps each reported field name to its formatted messages;
    /// `source` is the engine's violations collection they were built from.
    #[error("validation failed for {} field(s)", .fields.len())]
    Invalid {
        fields: ViolationMap,
        #[source]
        source: ValidationErrors,
    },

    /// The rule tags themselves are unusable (unknown rule, bad syntax,
    /// bad parameter, rule applied to the wrong kind of value)
    #[error(transparent)]
    Engine(EngineError),
}

impl CheckError {
    /// Field messages, when the value broke rules
    pub fn fields(&self) -> Option<&ViolationMap> {
        match self {
            CheckError::Invalid { fields, .. } => Some(fields),
            CheckError::Engine(_) => None,
        }
    }

    /// Take the field messages, when the value broke rules
    pub fn into_fields(self) -> Option<ViolationMap> {
        match self {
            CheckError::Invalid { fields, .. } => Some(fields),
            CheckError::Engine(_) => None,
        }
    }

    /// The raw violations collection, when the value broke rules
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            CheckError::Invalid { source, .. } => Some(source),
            CheckError::Engine(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, CheckError::Invalid { .. })
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CheckError::Invalid { fields, .. } => serde_json::json!({ "errors": fields }),
            CheckError::Engine(err) => serde_json::json!({ "error": err.to_string() }),
        }
    }
}

/// Error returned when building a [`Checker`](crate::Checker) with
/// `strict_rules` enabled
#[derive(Error, Debug, Clone)]
pub enum BuildError {
    #[error("failed to register validation rule '{tag}': {source}")]
    Rule {
        tag: String,
        #[source]
        source: RegistrationError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagcheck_engine::{FieldViolation, Kind};

    fn invalid() -> CheckError {
        let violation = FieldViolation::new("name", "name", "required", Kind::String);
        let mut fields = ViolationMap::new();
        fields.insert("name".to_string(), vec!["This field is required".to_string()]);
        CheckError::Invalid {
            fields,
            source: ValidationErrors::new(vec![violation]),
        }
    }

    #[test]
    fn test_invalid_accessors() {
        let err = invalid();
        assert!(err.is_invalid());
        assert_eq!(err.to_string(), "validation failed for 1 field(s)");
        assert_eq!(err.violations().map(|v| v.len()), Some(1));
        assert_eq!(
            err.into_fields().unwrap()["name"],
            vec!["This field is required".to_string()]
        );
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err = CheckError::Engine(EngineError::UndefinedRule {
            field: "User.kind".to_string(),
            tag: "myType".to_string(),
        });
        assert!(!err.is_invalid());
        assert!(err.fields().is_none());
        assert_eq!(
            err.to_string(),
            "undefined validation rule 'myType' on field 'User.kind'"
        );
    }

    #[test]
    fn test_to_json() {
        let json = invalid().to_json();
        assert_eq!(json["errors"]["name"][0], "This field is required");
    }
}
