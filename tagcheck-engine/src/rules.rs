// Rule tag compilation

use crate::validators::{BadParam, Builtin};
use crate::{EngineError, RuleFn};
use std::collections::HashMap;
use std::fmt;

const OMIT_EMPTY: &str = "omitempty";

/// How a single rule is evaluated
#[derive(Clone)]
pub(crate) enum Check {
    Builtin(Builtin),
    Custom(RuleFn),
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            Check::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One `name=param` entry
#[derive(Debug, Clone)]
pub(crate) struct Alternative {
    pub(crate) name: String,
    pub(crate) param: String,
    pub(crate) check: Check,
}

/// A comma-separated entry, possibly with `|` alternatives
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    /// Tag as written, e.g. `min` or `email|uuid`
    pub(crate) tag: String,
    /// Parameter of the first alternative
    pub(crate) param: String,
    pub(crate) alternatives: Vec<Alternative>,
}

impl CompiledRule {
    pub(crate) fn is_required(&self) -> bool {
        self.alternatives.len() == 1
            && matches!(self.alternatives[0].check, Check::Builtin(Builtin::Required))
    }
}

/// A field's full rule tag
#[derive(Debug, Clone, Default)]
pub(crate) struct CompiledTag {
    pub(crate) omit_empty: bool,
    pub(crate) rules: Vec<CompiledRule>,
}

/// Compile a rule tag such as `omitempty,min=3,email|uuid`.
///
/// Custom rules shadow built-ins with the same tag. `field` is only used
/// for error reporting.
pub(crate) fn compile(
    rules: &str,
    custom: &HashMap<String, RuleFn>,
    field: &str,
) -> Result<CompiledTag, EngineError> {
    let invalid = |reason: &str| EngineError::InvalidTag {
        field: field.to_string(),
        rules: rules.to_string(),
        reason: reason.to_string(),
    };

    let mut compiled = CompiledTag::default();
    if rules.trim().is_empty() {
        return Ok(compiled);
    }

    for entry in rules.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(invalid("empty rule"));
        }
        if entry == OMIT_EMPTY {
            compiled.omit_empty = true;
            continue;
        }

        let mut alternatives = Vec::new();
        for part in entry.split('|') {
            let (name, param) = match part.split_once('=') {
                Some((name, param)) => (name.trim(), param.trim()),
                None => (part.trim(), ""),
            };
            if name.is_empty() {
                return Err(invalid("missing rule name"));
            }
            if name == OMIT_EMPTY {
                return Err(invalid("omitempty cannot be combined with other rules"));
            }
            alternatives.push(Alternative {
                name: name.to_string(),
                param: param.to_string(),
                check: lookup(name, param, custom, field)?,
            });
        }

        compiled.rules.push(CompiledRule {
            tag: alternatives
                .iter()
                .map(|alt| alt.name.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            param: alternatives[0].param.clone(),
            alternatives,
        });
    }

    Ok(compiled)
}

fn lookup(
    name: &str,
    param: &str,
    custom: &HashMap<String, RuleFn>,
    field: &str,
) -> Result<Check, EngineError> {
    if let Some(handler) = custom.get(name) {
        return Ok(Check::Custom(handler.clone()));
    }

    match Builtin::parse(name, param) {
        Ok(Some(builtin)) => Ok(Check::Builtin(builtin)),
        Ok(None) => Err(EngineError::UndefinedRule {
            field: field.to_string(),
            tag: name.to_string(),
        }),
        Err(BadParam) => Err(EngineError::InvalidParam {
            field: field.to_string(),
            tag: name.to_string(),
            param: param.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldLevel;
    use std::sync::Arc;

    fn no_custom() -> HashMap<String, RuleFn> {
        HashMap::new()
    }

    #[test]
    fn test_compile_simple_tag() {
        let tag = compile("required,min=3,max=10", &no_custom(), "User.name").unwrap();
        assert!(!tag.omit_empty);
        let tags: Vec<_> = tag.rules.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, ["required", "min", "max"]);
        assert_eq!(tag.rules[1].param, "3");
        assert!(tag.rules[0].is_required());
    }

    #[test]
    fn test_compile_omitempty_and_alternatives() {
        let tag = compile("omitempty,email|uuid", &no_custom(), "User.id").unwrap();
        assert!(tag.omit_empty);
        assert_eq!(tag.rules.len(), 1);
        assert_eq!(tag.rules[0].tag, "email|uuid");
        assert_eq!(tag.rules[0].alternatives.len(), 2);
    }

    #[test]
    fn test_empty_tag_compiles_to_nothing() {
        let tag = compile("  ", &no_custom(), "User.a").unwrap();
        assert!(tag.rules.is_empty());
    }

    #[test]
    fn test_custom_rule_shadows_builtin() {
        let mut custom = no_custom();
        let handler: RuleFn = Arc::new(|_: &FieldLevel<'_>| true);
        custom.insert("email".to_string(), handler);

        let tag = compile("email", &custom, "User.email").unwrap();
        assert!(matches!(tag.rules[0].alternatives[0].check, Check::Custom(_)));
    }

    #[test]
    fn test_undefined_rule() {
        let err = compile("required,myType", &no_custom(), "User.kind").unwrap_err();
        assert!(matches!(
            err,
            EngineError::UndefinedRule { ref tag, ref field } if tag == "myType" && field == "User.kind"
        ));
    }

    #[test]
    fn test_invalid_tags() {
        assert!(matches!(
            compile("required,,min=1", &no_custom(), "f"),
            Err(EngineError::InvalidTag { .. })
        ));
        assert!(matches!(
            compile("=3", &no_custom(), "f"),
            Err(EngineError::InvalidTag { .. })
        ));
        assert!(matches!(
            compile("email|omitempty", &no_custom(), "f"),
            Err(EngineError::InvalidTag { .. })
        ));
    }

    #[test]
    fn test_invalid_param() {
        let err = compile("min=three", &no_custom(), "User.age").unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParam { ref tag, ref param, .. } if tag == "min" && param == "three"
        ));
    }
}
