// Process-wide custom rule registry

use crate::CustomRule;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Registry {
    rules: Vec<Arc<dyn CustomRule>>,
    /// Set once the shared instance has taken its copy of `rules`
    sealed: bool,
}

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::default()));

/// Register a custom rule for the shared instance.
///
/// Must run before the first call to [`instance`](crate::instance) or
/// [`check`](crate::check): the shared instance is built once and later
/// registrations do not reach it.
pub fn add_rule<R: CustomRule + 'static>(rule: R) {
    add_shared_rule(Arc::new(rule));
}

/// Register an already shared custom rule
pub fn add_shared_rule(rule: Arc<dyn CustomRule>) {
    let mut registry = REGISTRY.lock();
    if registry.sealed {
        tracing::warn!(
            tag = rule.tag(),
            "Validator instance already built, rule will not be applied"
        );
    }
    registry.rules.push(rule);
}

/// Rules registered so far, in registration order
pub fn registered_rules() -> Vec<Arc<dyn CustomRule>> {
    REGISTRY.lock().rules.clone()
}

/// Copy the rules for the shared instance build. Registrations from here on
/// are reported as late.
pub(crate) fn seal() -> Vec<Arc<dyn CustomRule>> {
    let mut registry = REGISTRY.lock();
    registry.sealed = true;
    registry.rules.clone()
}

/// Undo [`seal`] after a build that was not kept
pub(crate) fn unseal() {
    REGISTRY.lock().sealed = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;

    // The only unit test touching the process-wide registry
    #[test]
    fn test_registration_during_build_is_late() {
        add_rule(Rule::new("before", |_| true));
        let copy = seal();

        add_rule(Rule::new("during", |_| true));
        assert!(REGISTRY.lock().sealed);
        assert!(copy.iter().any(|rule| rule.tag() == "before"));
        assert!(!copy.iter().any(|rule| rule.tag() == "during"));
        assert_eq!(registered_rules().len(), copy.len() + 1);

        unseal();
        assert!(!REGISTRY.lock().sealed);
    }
}
