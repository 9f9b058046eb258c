//! Recursive schema transformation.
//!
//! Produces a new tree with sanitized keys, excluded subtrees removed and
//! string arrays normalized to snake_case tokens. The source tree is never
//! modified.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::sanitize::{is_array_of_strings, normalize_array, sanitize_str};
use crate::types::{json_type_name, pointer_join, Config};

/// Transform a schema document.
///
/// # Errors
///
/// Returns `SchemaError::NotAnObject` if `document` is not an object, and
/// `SchemaError::TooDeep` if nesting exceeds `config.max_depth`.
pub fn transform(document: &Value, config: &Config) -> Result<Value, SchemaError> {
    let Value::Object(map) = document else {
        return Err(SchemaError::NotAnObject {
            path: String::new(),
            actual: json_type_name(document).to_string(),
        });
    };
    transform_object(map, config, "", 0).map(Value::Object)
}

fn transform_object(
    map: &Map<String, Value>,
    config: &Config,
    path: &str,
    depth: usize,
) -> Result<Map<String, Value>, SchemaError> {
    if depth > config.max_depth {
        return Err(SchemaError::TooDeep {
            path: path.to_string(),
            limit: config.max_depth,
        });
    }

    let mut result = Map::new();

    for (key, value) in map {
        let clone_key = sanitize_str(key, config.snake_case_keys);

        // Excluded keys drop their whole subtree
        if config.exceptions.contains(&clone_key) {
            tracing::trace!(path, key = %key, "skipping excluded key");
            continue;
        }

        let child_path = pointer_join(path, key);
        let item = match value {
            Value::Array(arr) if is_array_of_strings(value) => {
                Value::Array(normalize_array(arr, &child_path)?)
            }
            Value::Object(child) => {
                Value::Object(transform_object(child, config, &child_path, depth + 1)?)
            }
            // Primitives, mixed and empty arrays pass through unchanged
            other => other.clone(),
        };
        result.insert(clone_key, item);
    }

    Ok(result)
}
