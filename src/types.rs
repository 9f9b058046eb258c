//! Core types for schema transformation.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sanitize::sanitize_str;

/// Default `$schema` URL added when a document does not declare one.
pub const DEFAULT_SCHEMA_URL: &str = "http://json-schema.org/schema#";

/// Default nesting limit for recursive walks.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Name of the URL template used when a lookup falls back.
pub const VERSION_TEMPLATE: &str = "version";

/// Name of the URL template used to resolve `$ref` values.
pub const REFERENCE_TEMPLATE: &str = "reference";

/// Field names with first-discovery order preserved.
pub type RequiredFieldSet = IndexSet<String>;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Appends a key to a JSON Pointer path, escaping `~` and `/`.
pub fn pointer_join(path: &str, key: &str) -> String {
    format!("{}/{}", path, key.replace('~', "~0").replace('/', "~1"))
}

/// Outcome of mapping a field's `type`/`format` to a target type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolution<'a> {
    /// The token was found in the type map.
    Mapped(String),
    /// Type information was supplied but is not in the type map.
    Unmapped,
    /// Neither `type` nor `format` is present; the field is handed back.
    PassThrough(&'a Value),
}

impl TypeResolution<'_> {
    /// Returns the mapped type name, if any.
    pub fn mapped(&self) -> Option<&str> {
        match self {
            TypeResolution::Mapped(name) => Some(name),
            _ => None,
        }
    }
}

/// Outcome of deriving a namespace from a field's `ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<'a> {
    /// Namespace found in a `/definitions/<name>` fragment or the first path segment.
    Resolved(String),
    /// The URL matched the template but yielded nothing usable.
    Unresolved,
    /// The `ref` does not match the reference template; handed back as-is.
    PassThrough(&'a str),
}

impl Reference<'_> {
    /// Returns the namespace the reference points at, passing through raw refs.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Reference::Resolved(name) => Some(name),
            Reference::PassThrough(raw) => Some(raw),
            Reference::Unresolved => None,
        }
    }
}

/// Engine settings, fixed once an engine is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Convert object keys to snake_case during transformation.
    pub snake_case_keys: bool,
    /// Sanitized keys whose whole subtree is dropped.
    pub exceptions: IndexSet<String>,
    /// Canonical type/format token to target type name.
    pub type_map: IndexMap<String, String>,
    /// Named URI templates (`version`, `reference`, `definition`).
    pub url_templates: IndexMap<String, String>,
    /// Value written to `schema` when the document has none.
    pub default_schema_url: String,
    /// Model name, also written to the document `title`.
    pub schema_name: String,
    /// Maximum nesting depth before a walk is abandoned.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snake_case_keys: true,
            exceptions: IndexSet::from(["definitions".to_string()]),
            type_map: default_type_map(),
            url_templates: default_url_templates(),
            default_schema_url: DEFAULT_SCHEMA_URL.to_string(),
            schema_name: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Create a config for the given logical schema name (e.g. `"card"` or `"card.json"`).
    ///
    /// The name is sanitized and its first character upper-cased.
    pub fn new(logical_name: &str) -> Self {
        Self {
            schema_name: Self::schema_name_from(logical_name),
            ..Self::default()
        }
    }

    /// Derive a model name from a logical name or file path.
    pub fn schema_name_from(logical_name: &str) -> String {
        let stem = std::path::Path::new(logical_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(logical_name);
        upcase_first(&sanitize_str(stem, false))
    }

    /// Set snake_case key conversion.
    pub fn snake_case_keys(mut self, enabled: bool) -> Self {
        self.snake_case_keys = enabled;
        self
    }

    /// Replace the set of excluded keys.
    pub fn exceptions<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exceptions = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the maximum nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Override the schema name verbatim.
    pub fn schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = name.into();
        self
    }
}

fn upcase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn default_type_map() -> IndexMap<String, String> {
    [
        ("array", "Array"),
        ("integer", "Integer"),
        ("number", "Float"),
        ("string", "String"),
        ("boolean", "Mongoid::Boolean"),
        ("null", "Null"),
        ("object", "Hash"),
        ("date", "Date"),
        ("date_time", "DateTime"),
        ("time", "Time"),
        ("uri", "String"),
        ("email", "String"),
        ("phone", "String"),
        ("geo", "Hash"),
        ("adr", "Hash"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_url_templates() -> IndexMap<String, String> {
    [
        (VERSION_TEMPLATE, "{scheme}://{host}{/segments*}{#fragment}"),
        (REFERENCE_TEMPLATE, "{scheme}://{host}{/segments*}{#fragments*}"),
        ("definition", "#/definitions{/segments*}"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
