//! `$ref` resolution to a local namespace name.

use serde_json::Value;

use crate::types::{Reference, REFERENCE_TEMPLATE};
use crate::uri::UrlTemplates;

const DEFINITIONS_PREFIX: &str = "/definitions/";

/// Derive the namespace a field's `ref` points at.
///
/// A `/definitions/<name>` fragment wins over the first path segment.
/// A ref that does not fit the `reference` template is handed back as
/// `Reference::PassThrough`; a missing or non-string ref is `Unresolved`.
pub fn resolve_reference<'a>(field: &'a Value, urls: &UrlTemplates) -> Reference<'a> {
    let Some(reference) = field.get("ref").and_then(Value::as_str) else {
        return Reference::Unresolved;
    };

    let Some(found) = urls.extract(reference, REFERENCE_TEMPLATE) else {
        return Reference::PassThrough(reference);
    };

    let from_fragment = found
        .fragments()
        .unwrap_or_default()
        .iter()
        .find_map(|fragment| definition_name(fragment));
    if let Some(name) = from_fragment {
        return Reference::Resolved(name.to_string());
    }

    match found.segments().and_then(|s| s.first()) {
        Some(segment) => Reference::Resolved(segment.clone()),
        None => Reference::Unresolved,
    }
}

fn definition_name(fragment: &str) -> Option<&str> {
    let start = fragment.find(DEFINITIONS_PREFIX)? + DEFINITIONS_PREFIX.len();
    let name = &fragment[start..];
    (!name.is_empty()).then_some(name)
}
