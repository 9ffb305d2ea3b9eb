// Field-name resolution from serde metadata

use tagcheck_engine::{Engine, FieldMeta, SerdeName, default_field_name};

/// Name reported for a field: its serde name, `""` when serde skips it,
/// or the engine default (the identifier) when it declares none
pub fn serde_field_name(meta: &FieldMeta) -> String {
    match meta.serde {
        Some(SerdeName::Named(name)) => name.to_string(),
        Some(SerdeName::Skipped) => String::new(),
        None => default_field_name(meta),
    }
}

/// Make `engine` report serde names
pub fn install(engine: &mut Engine) {
    engine.register_tag_name_fn(serde_field_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_name() {
        let meta = FieldMeta::new("email_address", "email").with_serde(SerdeName::Named("email"));
        assert_eq!(serde_field_name(&meta), "email");
    }

    #[test]
    fn test_skipped_field_resolves_to_empty() {
        let meta = FieldMeta::new("secret", "required").with_serde(SerdeName::Skipped);
        assert_eq!(serde_field_name(&meta), "");
    }

    #[test]
    fn test_falls_back_to_identifier() {
        let meta = FieldMeta::new("r#type", "required");
        assert_eq!(serde_field_name(&meta), "type");
    }

    #[test]
    fn test_install() {
        let mut engine = Engine::new();
        let meta = FieldMeta::new("user_id", "required").with_serde(SerdeName::Named("userId"));
        assert_eq!(engine.field_name(&meta), "user_id");

        install(&mut engine);
        assert_eq!(engine.field_name(&meta), "userId");
    }
}
