//! Type/format mapping from schema tokens to target type names.

use indexmap::IndexMap;
use serde_json::Value;

use crate::sanitize::sanitize_str;
use crate::types::TypeResolution;

/// Map a field's `format` (preferred) or `type` to a target type name.
///
/// A `null` value counts as absent. A field with neither key comes back as `TypeResolution::PassThrough`,
/// so callers can tell "no type information" apart from "unknown type"
/// (`TypeResolution::Unmapped`).
pub fn resolve_type<'a>(field: &'a Value, type_map: &IndexMap<String, String>) -> TypeResolution<'a> {
    let type_token = field.get("type").filter(|v| !v.is_null());
    let format_token = field.get("format").filter(|v| !v.is_null());

    let Some(winner) = format_token.or(type_token) else {
        return TypeResolution::PassThrough(field);
    };

    match type_token_str(winner) {
        Some(token) => match type_map.get(&sanitize_str(token, true)) {
            Some(name) => TypeResolution::Mapped(name.clone()),
            None => TypeResolution::Unmapped,
        },
        None => TypeResolution::Unmapped,
    }
}

/// A list such as `["string", "null"]` maps by its first non-null entry.
fn type_token_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(types) => {
            let mut names = types.iter().filter_map(Value::as_str);
            let first = names.clone().find(|t| *t != "null");
            first.or_else(|| names.next())
        }
        _ => None,
    }
}
