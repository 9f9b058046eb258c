//! Field-property aggregation and required-field merging.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::types::{json_type_name, pointer_join, RequiredFieldSet};

/// Collect the names of fields whose `property` is the literal `true`.
///
/// Walks every object-valued entry of `node`. The enclosing key is recorded,
/// not the property name. Identity is the field name alone, so two fields
/// with the same name in different branches collapse into one entry.
///
/// # Errors
///
/// Returns `SchemaError::TooDeep` if nesting exceeds `max_depth`.
pub fn collect_field_property(
    node: &Value,
    property: &str,
    max_depth: usize,
) -> Result<RequiredFieldSet, SchemaError> {
    let mut fields = RequiredFieldSet::new();
    if let Value::Object(map) = node {
        collect_into(map, property, "", 0, max_depth, &mut fields)?;
    }
    Ok(fields)
}

fn collect_into(
    map: &Map<String, Value>,
    property: &str,
    path: &str,
    depth: usize,
    max_depth: usize,
    fields: &mut RequiredFieldSet,
) -> Result<(), SchemaError> {
    if depth > max_depth {
        return Err(SchemaError::TooDeep {
            path: path.to_string(),
            limit: max_depth,
        });
    }

    for (key, value) in map {
        let Value::Object(item) = value else {
            continue;
        };
        if item.get(property) == Some(&Value::Bool(true)) && fields.insert(key.clone()) {
            tracing::debug!(field = %key, property, "field property discovered");
        }
        collect_into(item, property, &pointer_join(path, key), depth + 1, max_depth, fields)?;
    }

    Ok(())
}

/// Fold nested `required: true` markers into the top-level `required` list.
///
/// When nothing is discovered the tree is returned untouched, including any
/// duplicates in an existing `required` list. Otherwise the existing entries
/// keep their order, discovered fields follow, and the result is deduplicated.
///
/// # Errors
///
/// Returns `SchemaError::NotAnObject` if `tree` is not an object,
/// `SchemaError::InvalidRequired` if a merge is needed and the existing
/// `required` is not an array of strings, and `SchemaError::TooDeep` from
/// the aggregation walk.
pub fn merge_required(tree: Value, max_depth: usize) -> Result<Value, SchemaError> {
    let discovered = collect_field_property(&tree, "required", max_depth)?;
    if discovered.is_empty() {
        return Ok(tree);
    }
    update_field_property(tree, "required", discovered)
}

/// Merge `fields` after the values already listed under `property` and write
/// the ordered, deduplicated result back.
///
/// # Errors
///
/// Returns `SchemaError::NotAnObject` if `tree` is not an object, and
/// `SchemaError::InvalidRequired` if `property` holds anything other than an
/// array of strings.
pub fn update_field_property(
    tree: Value,
    property: &str,
    fields: RequiredFieldSet,
) -> Result<Value, SchemaError> {
    let mut map = match tree {
        Value::Object(map) => map,
        other => {
            return Err(SchemaError::NotAnObject {
                path: String::new(),
                actual: json_type_name(&other).to_string(),
            });
        }
    };

    let path = pointer_join("", property);
    let mut merged = RequiredFieldSet::new();
    match map.get(property) {
        None => {}
        Some(Value::Array(existing)) => {
            for (i, value) in existing.iter().enumerate() {
                let name = value.as_str().ok_or_else(|| SchemaError::InvalidRequired {
                    path: format!("{}/{}", path, i),
                    actual: json_type_name(value).to_string(),
                })?;
                merged.insert(name.to_string());
            }
        }
        Some(other) => {
            return Err(SchemaError::InvalidRequired {
                path,
                actual: json_type_name(other).to_string(),
            });
        }
    }

    merged.extend(fields);
    map.insert(
        property.to_string(),
        Value::Array(merged.into_iter().map(Value::String).collect()),
    );
    Ok(Value::Object(map))
}
