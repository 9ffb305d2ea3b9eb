//! tagcheck - struct validation with per-field messages
//!
//! Wraps the tag-driven validation engine with:
//!
//! - a process-wide validator instance, built once on first use
//! - a registry of custom rules applied to that instance
//! - field names taken from serde (`rename`, `rename_all`, `skip`)
//! - failures reshaped into `field name -> messages`
//!
//! # Examples
//!
//! ```
//! use tagcheck::{Checker, Rule, Validate};
//!
//! #[derive(Validate)]
//! struct Signup {
//!     #[serde(rename = "name")]
//!     #[validate("required")]
//!     full_name: String,
//!
//!     #[validate("required,slug")]
//!     handle: String,
//! }
//!
//! let checker = Checker::builder()
//!     .rule(Rule::new("slug", |fl| {
//!         fl.value().as_str().is_some_and(|s| s.chars().all(|c| c.is_ascii_lowercase() || c == '-'))
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let ok = Signup { full_name: "Alice".into(), handle: "alice".into() };
//! assert!(checker.check(&ok, None).is_ok());
//!
//! let bad = Signup { full_name: String::new(), handle: "Alice!".into() };
//! let fields = checker.check(&bad, None).unwrap_err().into_fields().unwrap();
//! assert_eq!(fields["name"], ["This field is required"]);
//! assert_eq!(fields["handle"], ["Failed the 'slug' rule"]);
//! ```
//!
//! ## Shared Instance
//!
//! ```
//! use tagcheck::{Rule, Validate};
//!
//! #[derive(Validate)]
//! struct Payment {
//!     #[validate("gt=0,currency")]
//!     amount: u64,
//! }
//!
//! // Register rules before the first check
//! tagcheck::add_rule(Rule::new("currency", |fl| {
//!     matches!(fl.value(), tagcheck::FieldValue::UInt(cents) if cents % 5 == 0)
//! }));
//!
//! assert!(tagcheck::check(&Payment { amount: 250 }, None).is_ok());
//! assert!(tagcheck::check(&Payment { amount: 3 }, None).is_err());
//! ```

extern crate self as tagcheck;

mod checker;
mod config;
mod error;
mod instance;
mod messages;
mod registry;
mod resolver;
mod rule;

pub use checker::*;
pub use config::*;
pub use error::*;
pub use instance::{check, check_data, instance, try_instance};
pub use messages::msg_for_tag;
pub use registry::{add_rule, add_shared_rule, registered_rules};
pub use resolver::serde_field_name;
pub use rule::*;

pub use tagcheck_derive::Validate;
pub use tagcheck_engine::{
    AsFieldValue, Engine, EngineError, Field, FieldLevel, FieldMeta, FieldValue, FieldViolation,
    Kind, Number, RegistrationError, RuleFn, SerdeName, TagNameFn, Validate, ValidationErrors,
    default_field_name,
};

/// The underlying validation engine
pub use tagcheck_engine as engine;
