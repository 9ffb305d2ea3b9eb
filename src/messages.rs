// Default violation messages

use tagcheck_engine::{FieldViolation, Kind};

/// Default formatter: an English message for each built-in rule.
///
/// Length rules count characters for strings and items for collections.
/// Custom rules get a generic message naming the rule.
pub fn msg_for_tag(violation: &FieldViolation) -> String {
    let param = violation.param.as_str();

    match violation.tag.as_str() {
        "required" => "This field is required".to_string(),
        "min" | "gte" => format!("Should be at least {}", measured(param, violation.kind)),
        "max" | "lte" => format!("Should be at most {}", measured(param, violation.kind)),
        "len" => format!("Should be exactly {}", measured(param, violation.kind)),
        "gt" => format!("Should be more than {}", measured(param, violation.kind)),
        "lt" => format!("Should be less than {}", measured(param, violation.kind)),
        "eq" => format!("Should be equal to {}", param),
        "ne" => format!("Should not be equal to {}", param),
        "oneof" => format!("Should be one of [{}]", param),
        "email" => "Invalid email".to_string(),
        "url" => "Invalid URL".to_string(),
        "uuid" => "Invalid UUID".to_string(),
        "alpha" => "Should contain only letters".to_string(),
        "alphanum" => "Should contain only letters and numbers".to_string(),
        "numeric" => "Should be a number".to_string(),
        "contains" => format!("Should contain '{}'", param),
        "startswith" => format!("Should start with '{}'", param),
        "endswith" => format!("Should end with '{}'", param),
        tag => format!("Failed the '{}' rule", tag),
    }
}

fn measured(param: &str, kind: Kind) -> String {
    let unit = match kind {
        Kind::String => "character",
        Kind::Collection => "item",
        _ => return param.to_string(),
    };

    if param == "1" {
        format!("{} {}", param, unit)
    } else {
        format!("{} {}s", param, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(tag: &str, param: &str, kind: Kind) -> FieldViolation {
        FieldViolation::new("field", "field", tag, kind).with_param(param)
    }

    #[test]
    fn test_required() {
        assert_eq!(
            msg_for_tag(&violation("required", "", Kind::String)),
            "This field is required"
        );
    }

    #[test]
    fn test_length_messages_depend_on_kind() {
        assert_eq!(
            msg_for_tag(&violation("min", "3", Kind::String)),
            "Should be at least 3 characters"
        );
        assert_eq!(
            msg_for_tag(&violation("max", "1", Kind::Collection)),
            "Should be at most 1 item"
        );
        assert_eq!(
            msg_for_tag(&violation("gte", "18", Kind::UInt)),
            "Should be at least 18"
        );
        assert_eq!(
            msg_for_tag(&violation("len", "8", Kind::String)),
            "Should be exactly 8 characters"
        );
    }

    #[test]
    fn test_parameterised_messages() {
        assert_eq!(
            msg_for_tag(&violation("oneof", "red green", Kind::String)),
            "Should be one of [red green]"
        );
        assert_eq!(
            msg_for_tag(&violation("startswith", "SKU-", Kind::String)),
            "Should start with 'SKU-'"
        );
    }

    #[test]
    fn test_custom_rule_fallback() {
        assert_eq!(
            msg_for_tag(&violation("myType", "", Kind::String)),
            "Failed the 'myType' rule"
        );
        assert_eq!(
            msg_for_tag(&violation("email|uuid", "", Kind::String)),
            "Failed the 'email|uuid' rule"
        );
    }
}
