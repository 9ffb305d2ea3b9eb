//! Tag-driven struct validation engine
//!
//! Validates struct fields against comma-separated rule tags such as
//! `required,min=3`. Field metadata is bound at compile time through the
//! [`Validate`] trait (normally derived with `tagcheck-derive`), so no
//! runtime reflection is involved.
//!
//! # Examples
//!
//! ```
//! use tagcheck_engine::{Engine, Field, FieldMeta, Validate};
//!
//! struct Login {
//!     user: String,
//! }
//!
//! static LOGIN_FIELDS: [FieldMeta; 1] = [FieldMeta::new("user", "required,alphanum")];
//!
//! impl Validate for Login {
//!     fn struct_name(&self) -> &'static str {
//!         "Login"
//!     }
//!
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::new(&LOGIN_FIELDS[0], &self.user)]
//!     }
//! }
//!
//! let engine = Engine::new();
//! assert!(engine.validate_struct(&Login { user: "john".into() }).is_ok());
//!
//! let err = engine.validate_struct(&Login { user: String::new() }).unwrap_err();
//! assert_eq!(err.violations().unwrap().errors[0].tag, "required");
//! ```
//!
//! ## Custom Rules
//!
//! ```
//! use tagcheck_engine::Engine;
//!
//! let mut engine = Engine::new();
//! engine
//!     .register_rule("even", |fl| matches!(fl.value(), tagcheck_engine::FieldValue::Int(n) if n % 2 == 0))
//!     .unwrap();
//! assert!(engine.has_rule("even"));
//! ```
//!
//! # Built-in Rules
//!
//! `required`, `omitempty`, `len`, `min`, `max`, `eq`, `ne`, `gt`, `gte`,
//! `lt`, `lte`, `oneof`, `email`, `url`, `uuid`, `alpha`, `alphanum`,
//! `numeric`, `contains`, `startswith`, `endswith`. Alternatives are
//! written `email|uuid`.

mod engine;
mod errors;
mod rules;
mod traits;
mod validators;
mod value;

pub use engine::*;
pub use errors::*;
pub use traits::*;
pub use value::*;
