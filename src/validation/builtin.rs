//! Built-in named validators
//!
//! Registered by the CLI and available to library users through
//! `builtin::bindings()`.

use std::sync::OnceLock;

use serde_json::Value;
use uuid::Uuid;

use super::custom::{validator_fn, ValidatorBindings, Verdict};

static EMAIL_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();

fn email_regex() -> Option<&'static regex::Regex> {
    EMAIL_RE
        .get_or_init(|| regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

/// `email`: string shaped like `local@domain.tld`
pub fn email(value: &Value, _data: &Value) -> Verdict {
    match (value.as_str(), email_regex()) {
        (Some(s), Some(re)) if re.is_match(s) => Verdict::Pass,
        _ => Verdict::fail(format!("{} is not a valid email address", value)),
    }
}

/// `uuid`: string parseable as a UUID
pub fn uuid(value: &Value, _data: &Value) -> Verdict {
    match value.as_str().map(Uuid::parse_str) {
        Some(Ok(_)) => Verdict::Pass,
        _ => Verdict::fail(format!("{} is not a valid UUID", value)),
    }
}

/// `non_empty`: non-blank string, non-empty array or object
pub fn non_empty(value: &Value, _data: &Value) -> Verdict {
    let ok = match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
        _ => true,
    };
    ok.into()
}

/// `positive`: number strictly greater than zero
pub fn positive(value: &Value, _data: &Value) -> Verdict {
    value.as_f64().map_or(false, |n| n > 0.0).into()
}

/// All built-in validators, bound under their names.
pub fn bindings() -> ValidatorBindings {
    ValidatorBindings::new()
        .with("email", validator_fn(email))
        .with("uuid", validator_fn(uuid))
        .with("non_empty", validator_fn(non_empty))
        .with("positive", validator_fn(positive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email() {
        let data = json!({});
        assert!(email(&json!("bob@example.com"), &data).is_pass());
        assert!(!email(&json!("bob@"), &data).is_pass());
        assert!(!email(&json!(42), &data).is_pass());
    }

    #[test]
    fn test_uuid() {
        let data = json!({});
        assert!(uuid(&json!("67e55044-10b1-426f-9247-bb680e5fe0c8"), &data).is_pass());
        assert!(!uuid(&json!("not-a-uuid"), &data).is_pass());
    }

    #[test]
    fn test_non_empty_and_positive() {
        let data = json!({});
        assert!(!non_empty(&json!("   "), &data).is_pass());
        assert!(!non_empty(&json!([]), &data).is_pass());
        assert!(non_empty(&json!([1]), &data).is_pass());
        assert!(positive(&json!(0.5), &data).is_pass());
        assert!(!positive(&json!(0), &data).is_pass());
        assert!(!positive(&json!("1"), &data).is_pass());
    }

    #[test]
    fn test_bindings_names() {
        let names = bindings().names().iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["email", "non_empty", "positive", "uuid"]);
    }
}
