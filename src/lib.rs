//! JSON Schema to document-model transformation.
//!
//! Converts a JSON Schema document into an annotated tree ready to be
//! rendered as a document-model class: keys are sanitized (and snake_cased),
//! `definitions` blocks are dropped, `$ref` URLs resolve to local namespaces,
//! nested `required: true` markers fold into the top-level `required` list,
//! and schema types map to target type names.
//!
//! # Example
//!
//! ```
//! use schema_model::{Config, Engine};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "familyName": { "type": "string", "required": true },
//!         "bday": { "type": "string", "format": "date" }
//!     }
//! });
//!
//! let mut engine = Engine::new(Config::new("card")).unwrap();
//! let tree = engine.run(&schema).unwrap();
//!
//! assert_eq!(tree["title"], "Card");
//! assert_eq!(tree["schema"], "http://json-schema.org/schema#");
//! assert_eq!(tree["required"], json!(["family_name"]));
//! assert_eq!(engine.field_type(&tree["properties"]["bday"]).mapped(), Some("Date"));
//! ```
//!
//! # Pipeline
//!
//! | Step | Effect |
//! |------|--------|
//! | transform | sanitize keys, drop exceptions, normalize string arrays |
//! | title | `title` set to the schema name |
//! | schema URL | `schema` defaulted when absent |
//! | dependencies | `dependencies` lists indexed by owner |
//! | required | nested `required: true` merged into `required` |
//!
//! Rendering is left to a [`Renderer`]; [`MongoidRenderer`] emits a Ruby
//! Mongoid document class.

mod annotate;
mod dependencies;
mod engine;
mod error;
mod loader;
mod mapper;
mod reference;
mod render;
mod required;
mod sanitize;
mod transform;
mod types;
mod uri;

pub use annotate::{annotate, capitalize, format_annotations};
pub use dependencies::DependencyGraph;
pub use engine::Engine;
pub use error::{GenerateError, LoadError, SchemaError};
pub use loader::{
    is_url, load_schema, load_schema_auto, load_schema_str, logical_name, write_output,
    SchemaSource,
};
pub use mapper::resolve_type;
pub use reference::resolve_reference;
pub use render::{MongoidRenderer, Renderer};
pub use required::{collect_field_property, merge_required, update_field_property};
pub use sanitize::{is_array_of_strings, normalize_array, sanitize, sanitize_str};
pub use transform::transform;
pub use types::{
    json_type_name, Config, Reference, RequiredFieldSet, TypeResolution, DEFAULT_MAX_DEPTH,
    DEFAULT_SCHEMA_URL,
};
pub use uri::{UriMatch, UriTemplate, UrlTemplates};

#[cfg(feature = "remote")]
pub use loader::load_schema_url;
