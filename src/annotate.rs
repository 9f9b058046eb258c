//! Per-field annotations consumed by renderers.

use serde_json::Value;

use crate::reference::resolve_reference;
use crate::uri::UrlTemplates;

/// Build the annotation list for a single field.
///
/// Description, nested property names, array item type and reference are
/// checked independently, so a field may carry several annotations.
pub fn annotate(field: &Value, schema_name: &str, urls: &UrlTemplates) -> Vec<String> {
    let mut results = Vec::new();

    if let Some(description) = field.get("description").and_then(Value::as_str) {
        if !description.is_empty() {
            results.push(format!("description: {}", description));
        }
    }

    if let Some(properties) = field.get("properties").and_then(Value::as_object) {
        let names: Vec<&str> = properties.keys().map(String::as_str).collect();
        results.push(format!("properties: {}", names.join(", ")));
    }

    if let Some(item_type) = field.get("items").and_then(|items| items.get("type")) {
        results.push(format!("items: {}", display(item_type)));
    }

    if let Some(reference) = field.get("ref").and_then(Value::as_str) {
        let resolved = resolve_reference(field, urls);
        match resolved.namespace() {
            Some(namespace) => results.push(format!(
                "reference: {}\n  # @todo: specify 'embedded_in :{}' within class {}",
                reference,
                schema_name,
                capitalize(namespace)
            )),
            None => {
                tracing::warn!(reference, "reference has no namespace");
                results.push(format!("reference: {}", reference));
            }
        }
    }

    results
}

/// Render annotations as a comment block, or a bare line break when empty.
pub fn format_annotations(annotations: &[String]) -> String {
    if annotations.is_empty() {
        "\n".to_string()
    } else {
        format!("\n  # field {}\n", annotations.join(", "))
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
