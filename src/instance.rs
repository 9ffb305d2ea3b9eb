// Shared validator instance

use crate::{BuildError, CheckError, Checker, Config, MessageFormatter, registry};
use once_cell::sync::OnceCell;
use tagcheck_engine::{FieldViolation, Validate};

static INSTANCE: OnceCell<Checker> = OnceCell::new();

/// The shared validator, built on first use from the registered rules and
/// [`Config::from_env`].
///
/// Built exactly once, even under concurrent first calls. Rules that fail
/// to register are logged and skipped whatever `strict_rules` says; use
/// [`try_instance`] to have them reported.
pub fn instance() -> &'static Checker {
    INSTANCE.get_or_init(|| {
        let config = Config {
            strict_rules: false,
            ..global_config()
        };
        match build(config) {
            Ok(checker) => checker,
            // lenient builds cannot fail
            Err(_) => Checker::new(),
        }
    })
}

/// Like [`instance`], but honours `strict_rules`. A failed build is not
/// cached, so a later call can still succeed or fall back to [`instance`].
pub fn try_instance() -> Result<&'static Checker, BuildError> {
    INSTANCE.get_or_try_init(|| {
        let built = build(global_config());
        if built.is_err() {
            registry::unseal();
        }
        built
    })
}

/// Validate `value` with the shared instance.
///
/// Uses [`msg_for_tag`](crate::msg_for_tag) when `formatter` is `None`.
pub fn check<T: Validate + ?Sized>(
    value: &T,
    formatter: Option<&MessageFormatter<'_>>,
) -> Result<(), CheckError> {
    instance().check(value, formatter)
}

/// Validate `value` with the shared instance and an explicit formatter
pub fn check_data<T, F>(value: &T, formatter: F) -> Result<(), CheckError>
where
    T: Validate + ?Sized,
    F: Fn(&FieldViolation) -> String,
{
    instance().check_data(value, formatter)
}

fn build(config: Config) -> Result<Checker, BuildError> {
    Checker::builder()
        .rules(registry::seal())
        .config(config)
        .build()
}

fn global_config() -> Config {
    Config::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Invalid validator configuration, using defaults");
        Config::default()
    })
}
