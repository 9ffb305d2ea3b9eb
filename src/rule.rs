// Custom validation rules

use std::fmt;
use std::sync::Arc;
use tagcheck_engine::{FieldLevel, RuleFn};

/// A named validation rule that extends the engine
///
/// `tag` is the name used in `#[validate("...")]`; `handler` returns `true`
/// when a value passes.
pub trait CustomRule: Send + Sync {
    fn tag(&self) -> &str;

    fn handler(&self) -> RuleFn;
}

/// Closure-backed [`CustomRule`]
#[derive(Clone)]
pub struct Rule {
    tag: String,
    handler: RuleFn,
}

impl Rule {
    pub fn new<F>(tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            tag: tag.into(),
            handler: Arc::new(handler),
        }
    }
}

impl CustomRule for Rule {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn handler(&self) -> RuleFn {
        self.handler.clone()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("tag", &self.tag).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagcheck_engine::{FieldMeta, FieldValue};

    #[test]
    fn test_rule_handler() {
        let rule = Rule::new("even", |fl| matches!(fl.value(), FieldValue::Int(n) if n % 2 == 0));
        let meta = FieldMeta::new("count", "even");
        let handler = rule.handler();

        assert_eq!(rule.tag(), "even");
        assert!(handler(&FieldLevel::new(FieldValue::Int(4), "", &meta, "Counter")));
        assert!(!handler(&FieldLevel::new(FieldValue::Int(3), "", &meta, "Counter")));
        assert_eq!(format!("{:?}", rule), "Rule { tag: \"even\" }");
    }
}
