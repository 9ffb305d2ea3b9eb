// Serde attribute inspection

use syn::{Attribute, Expr, LitStr, Token, parenthesized};

/// `rename_all` rules, applied to snake_case field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    pub fn from_str(rule: &str) -> Option<Self> {
        match rule {
            "lowercase" => Some(RenameRule::Lower),
            "UPPERCASE" => Some(RenameRule::Upper),
            "PascalCase" => Some(RenameRule::Pascal),
            "camelCase" => Some(RenameRule::Camel),
            "snake_case" => Some(RenameRule::Snake),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnake),
            "kebab-case" => Some(RenameRule::Kebab),
            "SCREAMING-KEBAB-CASE" => Some(RenameRule::ScreamingKebab),
            _ => None,
        }
    }

    pub fn apply_to_field(&self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => {
                let mut pascal = String::new();
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::Camel => {
                let pascal = RenameRule::Pascal.apply_to_field(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => RenameRule::ScreamingSnake
                .apply_to_field(field)
                .replace('_', "-"),
        }
    }
}

/// Serialization name resolved for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldName {
    Named(String),
    Skipped,
}

/// Read `#[serde(rename_all = "...")]` from container attributes
pub fn container_rename_rule(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    let mut rule = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit = if meta.input.peek(Token![=]) {
                    Some(meta.value()?.parse::<LitStr>()?)
                } else {
                    serialize_value(&meta)?
                };
                if let Some(lit) = lit {
                    rule = Some(RenameRule::from_str(&lit.value()).ok_or_else(|| {
                        syn::Error::new(lit.span(), format!("unknown rename rule `{}`", lit.value()))
                    })?);
                }
                Ok(())
            } else {
                skip_value(&meta)
            }
        })?;
    }

    Ok(rule)
}

/// Resolve the serialization name of a field.
///
/// Returns `None` when neither the field nor its container carries naming
/// attributes.
pub fn field_name(
    attrs: &[Attribute],
    ident: &str,
    rename_all: Option<RenameRule>,
) -> syn::Result<Option<FieldName>> {
    let mut rename = None;
    let mut skipped = false;

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit = if meta.input.peek(Token![=]) {
                    Some(meta.value()?.parse::<LitStr>()?)
                } else {
                    serialize_value(&meta)?
                };
                if let Some(lit) = lit {
                    rename = Some(lit.value());
                }
                Ok(())
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                skipped = true;
                Ok(())
            } else {
                skip_value(&meta)
            }
        })?;
    }

    if skipped {
        return Ok(Some(FieldName::Skipped));
    }
    if let Some(rename) = rename {
        return Ok(Some(FieldName::Named(rename)));
    }

    let unraw = ident.strip_prefix("r#").unwrap_or(ident);
    Ok(rename_all.map(|rule| FieldName::Named(rule.apply_to_field(unraw))))
}

/// Read the `serialize = "..."` half of `rename(serialize = "...", deserialize = "...")`
fn serialize_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Option<LitStr>> {
    let mut serialize = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            serialize = Some(inner.value()?.parse::<LitStr>()?);
            Ok(())
        } else {
            skip_value(&inner)
        }
    })?;
    Ok(serialize)
}

/// Consume the value of a serde option this crate does not interpret
fn skip_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}
