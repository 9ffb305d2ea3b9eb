// Validation engine

use crate::rules::{self, Check, CompiledRule, CompiledTag};
use crate::validators::{Builtin, Mismatch};
use crate::{
    EngineError, Field, FieldLevel, FieldMeta, FieldValue, FieldViolation, RegistrationError,
    RuleFn, TagNameFn, Validate, ValidationErrors, default_field_name,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Tags that cannot be registered as custom rules
const RESERVED_TAGS: &[&str] = &["omitempty", "required"];

/// Characters that have a meaning in rule tags
const RESTRICTED_CHARS: &[char] = &[',', '|', '='];

/// Tag-driven struct validator
///
/// Holds the custom rule table and the tag name function. Compiled rule
/// tags are cached per tag string; registering a rule clears the cache.
pub struct Engine {
    custom: HashMap<String, RuleFn>,
    tag_name_fn: Option<TagNameFn>,
    cache: RwLock<HashMap<&'static str, Arc<CompiledTag>>>,
}

impl Engine {
    /// Create an engine with only the built-in rules
    pub fn new() -> Self {
        Self {
            custom: HashMap::new(),
            tag_name_fn: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Register a custom rule under `tag`.
    ///
    /// Registering a tag twice replaces the earlier handler. Built-in rules
    /// other than `required` can be overridden the same way.
    pub fn register_validation(
        &mut self,
        tag: impl Into<String>,
        handler: RuleFn,
    ) -> Result<(), RegistrationError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(RegistrationError::EmptyTag);
        }
        if RESERVED_TAGS.contains(&tag.as_str())
            || tag.chars().any(|c| c.is_whitespace() || RESTRICTED_CHARS.contains(&c))
        {
            return Err(RegistrationError::ReservedTag(tag));
        }

        tracing::debug!(tag = %tag, "Registering validation rule");
        if self.custom.insert(tag, handler).is_some() {
            tracing::trace!("Replaced existing validation rule");
        }
        self.cache.get_mut().clear();
        Ok(())
    }

    /// Register a custom rule from a closure
    pub fn register_rule<F>(&mut self, tag: impl Into<String>, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_validation(tag, Arc::new(handler))
    }

    /// Install the function that maps field metadata to reported names
    pub fn register_tag_name_fn<F>(&mut self, name_fn: F)
    where
        F: Fn(&FieldMeta) -> String + Send + Sync + 'static,
    {
        self.tag_name_fn = Some(Arc::new(name_fn));
    }

    /// Whether a custom rule is registered under `tag`
    pub fn has_rule(&self, tag: &str) -> bool {
        self.custom.contains_key(tag)
    }

    /// Name reported for a field
    pub fn field_name(&self, meta: &FieldMeta) -> String {
        match &self.tag_name_fn {
            Some(name_fn) => name_fn(meta),
            None => default_field_name(meta),
        }
    }

    /// Validate every tagged field of `value`.
    ///
    /// Rule failures are collected into [`EngineError::Violations`] in field
    /// order, then rule order. A tag that cannot be compiled or applied
    /// aborts validation with the corresponding usage error.
    pub fn validate_struct<T: Validate + ?Sized>(&self, value: &T) -> Result<(), EngineError> {
        let struct_name = value.struct_name();
        let mut violations = ValidationErrors::default();

        for field in value.fields() {
            let compiled = self.compiled(struct_name, field.meta)?;
            self.validate_field(struct_name, &field, &compiled, &mut violations)?;
        }

        tracing::trace!(
            struct_name = struct_name,
            violations = violations.len(),
            "Validated struct"
        );

        if violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Violations(violations))
        }
    }

    fn compiled(
        &self,
        struct_name: &str,
        meta: &'static FieldMeta,
    ) -> Result<Arc<CompiledTag>, EngineError> {
        if let Some(compiled) = self.cache.read().get(meta.rules) {
            return Ok(compiled.clone());
        }

        let location = format!("{}.{}", struct_name, meta.ident());
        let compiled = Arc::new(rules::compile(meta.rules, &self.custom, &location)?);
        self.cache.write().insert(meta.rules, compiled.clone());
        Ok(compiled)
    }

    fn validate_field(
        &self,
        struct_name: &str,
        field: &Field<'_>,
        compiled: &CompiledTag,
        violations: &mut ValidationErrors,
    ) -> Result<(), EngineError> {
        if compiled.omit_empty && field.is_empty() {
            return Ok(());
        }

        for rule in &compiled.rules {
            // A None has nothing to inspect: report the first rule and stop
            if field.value == FieldValue::Nil && !rule.is_required() {
                violations.add(self.violation(struct_name, field, rule));
                break;
            }

            if self.passes(struct_name, field, rule)? {
                continue;
            }

            violations.add(self.violation(struct_name, field, rule));
            if rule.is_required() {
                break;
            }
        }

        Ok(())
    }

    fn passes(
        &self,
        struct_name: &str,
        field: &Field<'_>,
        rule: &CompiledRule,
    ) -> Result<bool, EngineError> {
        for alt in &rule.alternatives {
            let passed = match &alt.check {
                Check::Custom(handler) => {
                    handler(&FieldLevel::new(field.value, &alt.param, field.meta, struct_name))
                }
                // Presence, not the inner value, decides `required` on options
                Check::Builtin(Builtin::Required) => !field.is_empty(),
                Check::Builtin(builtin) => {
                    builtin.check(&field.value).map_err(|mismatch| {
                        let location = format!("{}.{}", struct_name, field.meta.ident());
                        match mismatch {
                            Mismatch::Kind(kind) => EngineError::UnsupportedKind {
                                field: location,
                                tag: alt.name.clone(),
                                kind,
                            },
                            Mismatch::Param => EngineError::InvalidParam {
                                field: location,
                                tag: alt.name.clone(),
                                param: alt.param.clone(),
                            },
                        }
                    })?
                }
            };
            if passed {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn violation(&self, struct_name: &str, field: &Field<'_>, rule: &CompiledRule) -> FieldViolation {
        FieldViolation::new(
            self.field_name(field.meta),
            field.meta.ident(),
            rule.tag.clone(),
            field.value.kind(),
        )
        .with_param(rule.param.clone())
        .with_value(field.value.render())
        .in_struct(struct_name)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.custom.keys().collect();
        tags.sort();
        f.debug_struct("Engine")
            .field("custom_rules", &tags)
            .field("tag_name_fn", &self.tag_name_fn.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, SerdeName};

    struct Signup {
        name: String,
        email: String,
        age: u32,
        nickname: Option<String>,
    }

    static SIGNUP_FIELDS: [FieldMeta; 4] = [
        FieldMeta::new("name", "required,min=2").with_serde(SerdeName::Named("fullName")),
        FieldMeta::new("email", "required,email"),
        FieldMeta::new("age", "gte=18,lte=130"),
        FieldMeta::new("nickname", "omitempty,alpha"),
    ];

    impl Validate for Signup {
        fn struct_name(&self) -> &'static str {
            "Signup"
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new(&SIGNUP_FIELDS[0], &self.name),
                Field::new(&SIGNUP_FIELDS[1], &self.email),
                Field::new(&SIGNUP_FIELDS[2], &self.age),
                Field::new(&SIGNUP_FIELDS[3], &self.nickname),
            ]
        }
    }

    fn valid_signup() -> Signup {
        Signup {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            age: 30,
            nickname: None,
        }
    }

    fn violations(result: Result<(), EngineError>) -> ValidationErrors {
        match result {
            Err(EngineError::Violations(errors)) => errors,
            other => panic!("expected violations, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_struct() {
        let engine = Engine::new();
        assert!(engine.validate_struct(&valid_signup()).is_ok());
    }

    #[test]
    fn test_violations_in_field_order() {
        let engine = Engine::new();
        let signup = Signup {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            age: 12,
            nickname: Some("n1ck".to_string()),
        };

        let errors = violations(engine.validate_struct(&signup));
        let tags: Vec<_> = errors.iter().map(|e| (e.field.as_str(), e.tag.as_str())).collect();
        assert_eq!(
            tags,
            [
                ("name", "min"),
                ("email", "email"),
                ("age", "gte"),
                ("nickname", "alpha")
            ]
        );
        assert_eq!(errors.errors[0].namespace, "Signup.name");
        assert_eq!(errors.errors[0].param, "2");
        assert_eq!(errors.errors[2].value.as_deref(), Some("12"));
        assert_eq!(errors.errors[2].kind, Kind::UInt);
    }

    #[test]
    fn test_required_failure_stops_field() {
        let engine = Engine::new();
        let signup = Signup {
            email: String::new(),
            ..valid_signup()
        };

        let errors = violations(engine.validate_struct(&signup));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].tag, "required");
    }

    #[test]
    fn test_tag_name_fn_is_used() {
        let mut engine = Engine::new();
        engine.register_tag_name_fn(|meta| match meta.serde {
            Some(SerdeName::Named(name)) => name.to_string(),
            _ => meta.ident().to_uppercase(),
        });

        let signup = Signup {
            name: String::new(),
            email: String::new(),
            ..valid_signup()
        };
        let errors = violations(engine.validate_struct(&signup));
        assert_eq!(errors.errors[0].field, "fullName");
        assert_eq!(errors.errors[0].namespace, "Signup.fullName");
        assert_eq!(errors.errors[0].struct_field, "name");
        assert_eq!(errors.errors[1].field, "EMAIL");
    }

    #[test]
    fn test_custom_rule_overrides_builtin() {
        let mut engine = Engine::new();
        engine
            .register_rule("email", |fl| {
                fl.value().as_str().is_some_and(|s| s.ends_with("@corp.test"))
            })
            .unwrap();

        let errors = violations(engine.validate_struct(&valid_signup()));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].tag, "email");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut engine = Engine::new();
        engine.register_rule("email", |_| false).unwrap();
        engine.register_rule("email", |_| true).unwrap();

        assert!(engine.validate_struct(&valid_signup()).is_ok());
    }

    #[test]
    fn test_register_rejects_reserved_tags() {
        let mut engine = Engine::new();
        assert_eq!(
            engine.register_rule("", |_| true),
            Err(RegistrationError::EmptyTag)
        );
        assert_eq!(
            engine.register_rule("required", |_| true),
            Err(RegistrationError::ReservedTag("required".to_string()))
        );
        assert!(engine.register_rule("a,b", |_| true).is_err());
        assert!(engine.register_rule("a|b", |_| true).is_err());
        assert!(engine.register_rule("my type", |_| true).is_err());
        assert!(!engine.has_rule("a,b"));
    }

    struct Tagged {
        kind: String,
        maybe: Option<u8>,
    }

    static TAGGED_FIELDS: [FieldMeta; 2] = [
        FieldMeta::new("kind", "myType"),
        FieldMeta::new("maybe", "min=1"),
    ];

    impl Validate for Tagged {
        fn struct_name(&self) -> &'static str {
            "Tagged"
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new(&TAGGED_FIELDS[0], &self.kind),
                Field::new(&TAGGED_FIELDS[1], &self.maybe),
            ]
        }
    }

    #[test]
    fn test_undefined_rule_is_usage_error() {
        let engine = Engine::new();
        let tagged = Tagged {
            kind: "x".to_string(),
            maybe: Some(1),
        };

        let err = engine.validate_struct(&tagged).unwrap_err();
        assert!(err.violations().is_none());
        assert!(matches!(err, EngineError::UndefinedRule { ref field, .. } if field == "Tagged.kind"));
    }

    #[test]
    fn test_registration_invalidates_cache() {
        let mut engine = Engine::new();
        let tagged = Tagged {
            kind: "x".to_string(),
            maybe: Some(1),
        };
        assert!(engine.validate_struct(&tagged).is_err());

        engine
            .register_rule("myType", |fl| fl.value() != FieldValue::Str("x"))
            .unwrap();
        let errors = violations(engine.validate_struct(&tagged));
        assert_eq!(errors.errors[0].tag, "myType");
    }

    struct Restock {
        quantity: Option<u32>,
        discount: Option<u8>,
    }

    static RESTOCK_FIELDS: [FieldMeta; 2] = [
        FieldMeta::new("quantity", "required"),
        FieldMeta::new("discount", "omitempty,gte=1"),
    ];

    impl Validate for Restock {
        fn struct_name(&self) -> &'static str {
            "Restock"
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new(&RESTOCK_FIELDS[0], &self.quantity),
                Field::new(&RESTOCK_FIELDS[1], &self.discount),
            ]
        }
    }

    #[test]
    fn test_some_zero_is_present() {
        let engine = Engine::new();
        let zeroes = Restock {
            quantity: Some(0),
            discount: Some(0),
        };

        let errors = violations(engine.validate_struct(&zeroes));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].field, "discount");
        assert_eq!(errors.errors[0].tag, "gte");
        assert_eq!(errors.errors[0].value.as_deref(), Some("0"));

        let missing = Restock {
            quantity: None,
            discount: None,
        };
        let errors = violations(engine.validate_struct(&missing));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].field, "quantity");
        assert_eq!(errors.errors[0].tag, "required");
    }

    #[test]
    fn test_none_reports_first_rule() {
        let mut engine = Engine::new();
        engine.register_rule("myType", |_| true).unwrap();
        let tagged = Tagged {
            kind: "y".to_string(),
            maybe: None,
        };

        let errors = violations(engine.validate_struct(&tagged));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].field, "maybe");
        assert_eq!(errors.errors[0].tag, "min");
        assert_eq!(errors.errors[0].kind, Kind::Nil);
    }

    #[test]
    fn test_alternatives() {
        struct Contact {
            handle: String,
        }

        static CONTACT_FIELDS: [FieldMeta; 1] = [FieldMeta::new("handle", "email|uuid")];

        impl Validate for Contact {
            fn struct_name(&self) -> &'static str {
                "Contact"
            }

            fn fields(&self) -> Vec<Field<'_>> {
                vec![Field::new(&CONTACT_FIELDS[0], &self.handle)]
            }
        }

        let engine = Engine::new();
        let by_email = Contact {
            handle: "a@b.io".to_string(),
        };
        let by_id = Contact {
            handle: "550e8400-e29b-41d4-a716-446655440000".to_string(),
        };
        let neither = Contact {
            handle: "bob".to_string(),
        };

        assert!(engine.validate_struct(&by_email).is_ok());
        assert!(engine.validate_struct(&by_id).is_ok());
        let errors = violations(engine.validate_struct(&neither));
        assert_eq!(errors.errors[0].tag, "email|uuid");
    }

    #[test]
    fn test_unsupported_kind() {
        struct Counter {
            hits: u64,
        }

        static COUNTER_FIELDS: [FieldMeta; 1] = [FieldMeta::new("hits", "email")];

        impl Validate for Counter {
            fn struct_name(&self) -> &'static str {
                "Counter"
            }

            fn fields(&self) -> Vec<Field<'_>> {
                vec![Field::new(&COUNTER_FIELDS[0], &self.hits)]
            }
        }

        let err = Engine::new()
            .validate_struct(&Counter { hits: 3 })
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedKind { kind: Kind::UInt, ref tag, .. } if tag == "email"
        ));
    }
}
