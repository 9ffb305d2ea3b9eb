// Configured validator instance and error aggregation

use crate::{BuildError, CheckError, Config, CustomRule, NameSource, msg_for_tag, resolver};
use std::collections::HashMap;
use std::sync::Arc;
use tagcheck_engine::{Engine, EngineError, FieldViolation, RegistrationError, Validate, ValidationErrors};

/// Reported field name to its messages, in the order the engine found them
pub type ViolationMap = HashMap<String, Vec<String>>;

/// Turns a violation into a human-readable message
pub type MessageFormatter<'a> = dyn Fn(&FieldViolation) -> String + 'a;

/// A validation engine with custom rules and name resolution installed
///
/// The rule set is fixed once built. Use [`Checker::builder`] to create one
/// at the composition root, or [`instance`](crate::instance) for the shared
/// process-wide one.
#[derive(Debug)]
pub struct Checker {
    engine: Engine,
    config: Config,
}

impl Checker {
    /// Checker with default config and only built-in rules
    pub fn new() -> Self {
        Self::assemble(Vec::new(), Config::default()).0
    }

    pub fn builder() -> CheckerBuilder {
        CheckerBuilder::new()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate `value`, formatting messages with `formatter` or
    /// [`msg_for_tag`] when none is given.
    ///
    /// `Ok(())` means no rule failed. Rule failures come back as
    /// [`CheckError::Invalid`] with the per-field messages and the original
    /// violations; unusable rule tags come back as [`CheckError::Engine`].
    pub fn check<T: Validate + ?Sized>(
        &self,
        value: &T,
        formatter: Option<&MessageFormatter<'_>>,
    ) -> Result<(), CheckError> {
        match formatter {
            Some(formatter) => self.check_data(value, formatter),
            None => self.check_data(value, msg_for_tag),
        }
    }

    /// Validate `value`, formatting messages with `formatter`
    pub fn check_data<T, F>(&self, value: &T, formatter: F) -> Result<(), CheckError>
    where
        T: Validate + ?Sized,
        F: Fn(&FieldViolation) -> String,
    {
        match self.engine.validate_struct(value) {
            Ok(()) => Ok(()),
            Err(EngineError::Violations(violations)) => {
                let fields = group_violations(&violations, formatter);
                tracing::debug!(
                    struct_name = value.struct_name(),
                    fields = fields.len(),
                    violations = violations.len(),
                    "Validation failed"
                );
                Err(CheckError::Invalid {
                    fields,
                    source: violations,
                })
            }
            Err(err) => {
                tracing::debug!(struct_name = value.struct_name(), error = %err, "Validation error");
                Err(CheckError::Engine(err))
            }
        }
    }

    /// Build an engine from `rules`, collecting registration failures
    /// instead of stopping at them
    fn assemble(
        rules: Vec<Arc<dyn CustomRule>>,
        config: Config,
    ) -> (Self, Vec<(String, RegistrationError)>) {
        let mut engine = Engine::new();
        let mut failures = Vec::new();

        for rule in &rules {
            if let Err(err) = engine.register_validation(rule.tag(), rule.handler()) {
                failures.push((rule.tag().to_string(), err));
            }
        }

        if config.name_source == NameSource::Serde {
            resolver::install(&mut engine);
        }

        tracing::debug!(
            rules = rules.len(),
            rejected = failures.len(),
            name_source = ?config.name_source,
            "Built validator"
        );

        (Self { engine, config }, failures)
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

/// Group violations by reported field name, keeping engine order per field
pub fn group_violations<F>(violations: &ValidationErrors, formatter: F) -> ViolationMap
where
    F: Fn(&FieldViolation) -> String,
{
    let mut out = ViolationMap::with_capacity(violations.len());
    for violation in violations {
        out.entry(violation.field.clone())
            .or_default()
            .push(formatter(violation));
    }
    out
}

/// Builder for [`Checker`]
#[derive(Default)]
pub struct CheckerBuilder {
    rules: Vec<Arc<dyn CustomRule>>,
    config: Config,
}

impl CheckerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a custom rule; later rules with the same tag win
    pub fn rule<R: CustomRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn CustomRule>>,
    {
        self.rules.extend(rules);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the checker.
    ///
    /// Rules that cannot be registered are logged and skipped, unless
    /// `strict_rules` is set, in which case the first one is returned as an
    /// error.
    pub fn build(self) -> Result<Checker, BuildError> {
        let strict = self.config.strict_rules;
        let (checker, failures) = Checker::assemble(self.rules, self.config);

        if let Some((tag, source)) = failures.first().filter(|_| strict) {
            return Err(BuildError::Rule {
                tag: tag.clone(),
                source: source.clone(),
            });
        }

        for (tag, err) in &failures {
            tracing::warn!(tag = %tag, error = %err, "Ignoring custom validation rule");
        }

        Ok(checker)
    }
}
