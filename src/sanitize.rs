//! Identifier sanitization for schema keys and string values.

use serde_json::Value;

use crate::error::SchemaError;
use crate::types::json_type_name;

/// Sanitize a JSON value into a canonical identifier token.
///
/// Only string values are accepted; anything else is reported as
/// `SchemaError::InvalidIdentifier` at `path`.
///
/// # Errors
///
/// Returns `SchemaError::InvalidIdentifier` if `value` is not a string.
pub fn sanitize(value: &Value, snake_case: bool, path: &str) -> Result<String, SchemaError> {
    match value {
        Value::String(s) => Ok(sanitize_str(s, snake_case)),
        other => Err(SchemaError::InvalidIdentifier {
            path: path.to_string(),
            actual: json_type_name(other).to_string(),
        }),
    }
}

/// Sanitize a string into a canonical identifier token.
///
/// Strips every character outside `[A-Za-z0-9_-]` (so `$ref` becomes `ref`),
/// then optionally converts camelCase to snake_case.
pub fn sanitize_str(value: &str, snake_case: bool) -> String {
    let stripped: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if snake_case {
        underscore(&stripped)
    } else {
        stripped
    }
}

/// Camel-to-snake inflection over an already sanitized ASCII token.
///
/// A separator goes before an upper-case letter that follows a lower-case
/// letter or digit, and before the last capital of an acronym run that
/// starts a new word (`HTMLParser` -> `html_parser`). Existing `_` and `-`
/// are kept as they are.
fn underscore(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let mut out = String::with_capacity(token.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }

    out
}

/// Returns true for a non-empty array whose elements are all non-empty strings.
pub fn is_array_of_strings(value: &Value) -> bool {
    match value {
        Value::Array(arr) if !arr.is_empty() => arr
            .iter()
            .all(|v| v.as_str().is_some_and(|s| !s.is_empty())),
        _ => false,
    }
}

/// Normalize an array of strings into snake_case tokens.
///
/// # Errors
///
/// Returns `SchemaError::InvalidIdentifier` for the first non-string element.
pub fn normalize_array(values: &[Value], path: &str) -> Result<Vec<Value>, SchemaError> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| sanitize(v, true, &format!("{}/{}", path, i)).map(Value::String))
        .collect()
}
