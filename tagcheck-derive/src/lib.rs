//! Derive macro for tagcheck
//!
//! `#[derive(Validate)]` binds each field's rule tag and serialization name
//! at compile time, which is what the validation engine inspects instead of
//! runtime reflection.
//!
//! ## Attributes
//!
//! - `#[validate("required,min=3")]` - rule tag for a field; fields without
//!   it are not inspected
//! - `#[serde(rename = "...")]` / `#[serde(rename_all = "...")]` - name
//!   reported in violations
//! - `#[serde(skip)]` / `#[serde(skip_serializing)]` - field is reported
//!   under the empty name

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod serde_attr;
mod validate;

/// Derive `tagcheck::Validate`
///
/// # Examples
///
/// ```ignore
/// #[derive(Serialize, Validate)]
/// #[serde(rename_all = "camelCase")]
/// pub struct Signup {
///     #[validate("required,min=2")]
///     pub display_name: String,
///     #[serde(rename = "email")]
///     #[validate("required,email")]
///     pub email_address: String,
/// }
/// ```
#[proc_macro_derive(Validate, attributes(validate, serde))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    validate::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
