//! Renderer boundary and the built-in Mongoid document renderer.

use std::fmt::Write as _;

use serde_json::Value;

use crate::engine::{properties, Engine};
use crate::error::SchemaError;
use crate::sanitize::sanitize_str;
use crate::types::{Reference, TypeResolution};

/// Turns a transformed schema tree into target source text.
///
/// Renderers receive the finished tree and query the engine for per-field
/// metadata (types, references, annotations, dependencies).
pub trait Renderer {
    /// Render `tree`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the tree cannot be rendered.
    fn render(&self, tree: &Value, engine: &Engine) -> Result<String, SchemaError>;
}

/// Renders a Ruby `Mongoid::Document` class followed by the source tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoidRenderer;

impl Renderer for MongoidRenderer {
    fn render(&self, tree: &Value, engine: &Engine) -> Result<String, SchemaError> {
        let mut out = String::new();

        let _ = writeln!(out, "# {}", str_field(tree, "schema"));
        let _ = writeln!(out, "# {}", str_field(tree, "description"));
        out.push('\n');
        let _ = writeln!(out, "class {}", str_field(tree, "title"));
        out.push_str("  include Mongoid::Document\n");
        out.push_str("  include Mongoid::Timestamps\n");

        if let Some(properties) = properties(tree)? {
            for (name, field) in properties {
                out.push_str(&engine.field_associations(field));
                out.push_str(&field_declaration(name, field, engine));
            }
        }

        for (owner, dependents) in engine.dependencies().all() {
            let _ = write!(
                out,
                "\n\n  # :{} dependents: {}\n  validates :{}, presence: true",
                owner,
                dependents.join(", "),
                owner
            );
        }

        let required: Vec<String> = tree
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|name| format!(":{}", name))
                    .collect()
            })
            .unwrap_or_default();
        if !required.is_empty() {
            let _ = write!(
                out,
                "\n\n  # required fields\n  validates {}, presence: true",
                required.join(", ")
            );
        }

        out.push_str("\nend\n\n__END__\n");
        let _ = writeln!(out, "{:#}", tree);
        Ok(out)
    }
}

fn field_declaration(name: &str, field: &Value, engine: &Engine) -> String {
    if let Some(namespace) = embedded_namespace(field, engine) {
        return format!("  embeds_one :{}", namespace);
    }

    let type_name = match engine.field_type(field) {
        TypeResolution::Mapped(type_name) => type_name,
        TypeResolution::Unmapped | TypeResolution::PassThrough(_) => engine
            .config()
            .type_map
            .get("object")
            .cloned()
            .unwrap_or_else(|| "Hash".to_string()),
    };
    format!("  field :{}, type: {}", name, type_name)
}

/// Namespace of a referenced model, trying the `definition` template for
/// document-local refs such as `#/definitions/geo`.
fn embedded_namespace(field: &Value, engine: &Engine) -> Option<String> {
    let namespace = match engine.field_reference(field) {
        Reference::Resolved(name) => name,
        Reference::PassThrough(raw) => engine
            .extract_url(raw, "definition")
            .and_then(|found| found.segments().and_then(|s| s.first().cloned()))
            .unwrap_or_else(|| raw.to_string()),
        Reference::Unresolved => return None,
    };
    let token = sanitize_str(&namespace, true);
    (!token.is_empty()).then_some(token)
}

fn str_field<'a>(tree: &'a Value, key: &str) -> &'a str {
    tree.get(key).and_then(Value::as_str).unwrap_or_default()
}
