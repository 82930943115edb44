//! Field path helpers
//!
//! Paths are dot-delimited (`user.address.city`). Array items are addressed
//! with numeric segments (`tags.0`) or brackets (`tags[0]`).

use serde_json::Value;

/// Splits a field path into its segments.
///
/// `a.b[0].c` yields `["a", "b", "0", "c"]`. Empty segments are dropped.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(|c: char| c == '.' || c == '[' || c == ']')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Looks up the value at `path` inside `data`.
///
/// A top-level key spelled exactly like `path` wins over splitting, so
/// `{"a.b": 1}` answers `a.b`. Otherwise returns `None` when any segment
/// is missing or walks through a scalar.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(value) = data.as_object().and_then(|map| map.get(path)) {
        return Some(value);
    }

    let mut current = data;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Joins a prefix and a field name into a path.
pub fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Returns whether a value counts as "present" for a required check.
///
/// `null`, `false`, `0` and `""` are falsy. Arrays and objects are always
/// truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the JSON type name used in messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a value for inclusion in an error message.
///
/// Strings are shown bare; everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
