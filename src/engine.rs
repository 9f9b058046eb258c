//! Transformation pipeline and renderer query surface.

use serde_json::{Map, Value};

use crate::annotate::{annotate, format_annotations};
use crate::dependencies::DependencyGraph;
use crate::error::SchemaError;
use crate::mapper::resolve_type;
use crate::reference::resolve_reference;
use crate::render::Renderer;
use crate::required::{collect_field_property, merge_required};
use crate::transform::transform;
use crate::types::{json_type_name, pointer_join, Config, Reference, RequiredFieldSet, TypeResolution};
use crate::uri::{UriMatch, UrlTemplates};

/// One engine processes one schema document.
///
/// Configuration and URL templates are fixed at construction; the
/// dependency graph is filled during [`Engine::run`].
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    urls: UrlTemplates,
    dependencies: DependencyGraph,
}

impl Engine {
    /// Create an engine for `config`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidTemplate` if a configured URL template
    /// does not parse.
    pub fn new(config: Config) -> Result<Self, SchemaError> {
        let urls = UrlTemplates::new(&config.url_templates)?;
        Ok(Self {
            config,
            urls,
            dependencies: DependencyGraph::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn schema_name(&self) -> &str {
        &self.config.schema_name
    }

    pub fn urls(&self) -> &UrlTemplates {
        &self.urls
    }

    /// Run the full pipeline over `document`.
    ///
    /// transform, title, schema URL, dependency tracking, required merge.
    /// The dependency graph is rebuilt on every run.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the document is not an object, nests too
    /// deeply, or carries a malformed `required` list.
    pub fn run(&mut self, document: &Value) -> Result<Value, SchemaError> {
        tracing::debug!(schema = %self.config.schema_name, "transforming schema");

        self.dependencies = DependencyGraph::new();
        let tree = transform(document, &self.config)?;
        let tree = self.add_title(tree)?;
        let tree = self.add_schema_url(tree)?;
        self.track_dependencies(&tree);
        let tree = merge_required(tree, self.config.max_depth)?;

        tracing::debug!(
            schema = %self.config.schema_name,
            dependency_owners = self.dependencies.all().len(),
            "schema transformed"
        );
        Ok(tree)
    }

    /// Run the pipeline and render the result.
    ///
    /// Returns `Ok(None)` without invoking the renderer when the transformed
    /// tree has no properties.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` from the pipeline or the renderer, and
    /// `SchemaError::NotAnObject` when `properties` or one of its values is
    /// not an object.
    pub fn generate<R: Renderer>(
        &mut self,
        document: &Value,
        renderer: &R,
    ) -> Result<Option<String>, SchemaError> {
        let tree = self.run(document)?;
        let has_properties = properties(&tree)?.is_some_and(|props| !props.is_empty());
        if !has_properties {
            tracing::debug!(schema = %self.config.schema_name, "no properties, skipping render");
            return Ok(None);
        }
        renderer.render(&tree, self).map(Some)
    }

    /// Set `title` to the schema name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotAnObject` if `tree` is not an object.
    pub fn add_title(&self, tree: Value) -> Result<Value, SchemaError> {
        let mut map = into_object(tree)?;
        map.insert(
            "title".to_string(),
            Value::String(self.config.schema_name.clone()),
        );
        Ok(Value::Object(map))
    }

    /// Set `schema` to the default URL unless the document declares one.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotAnObject` if `tree` is not an object.
    pub fn add_schema_url(&self, tree: Value) -> Result<Value, SchemaError> {
        let mut map = into_object(tree)?;
        if !map.contains_key("schema") {
            map.insert(
                "schema".to_string(),
                Value::String(self.config.default_schema_url.clone()),
            );
        }
        Ok(Value::Object(map))
    }

    fn track_dependencies(&mut self, tree: &Value) {
        if let Some(dependencies) = tree.get("dependencies") {
            self.dependencies.track(dependencies);
        }
    }

    /// Record that `dependent` depends on each of `dependencies`.
    pub fn add_dependencies<S: AsRef<str>>(&mut self, dependent: &str, dependencies: &[S]) {
        self.dependencies.add(dependent, dependencies);
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.dependencies
    }

    /// Fields anywhere in `tree` whose `property` is `true`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::TooDeep` if nesting exceeds the configured limit.
    pub fn field_property(
        &self,
        tree: &Value,
        property: &str,
    ) -> Result<RequiredFieldSet, SchemaError> {
        collect_field_property(tree, property, self.config.max_depth)
    }

    /// Target type name for a field.
    pub fn field_type<'a>(&self, field: &'a Value) -> TypeResolution<'a> {
        resolve_type(field, &self.config.type_map)
    }

    /// Namespace a field's `ref` points at.
    pub fn field_reference<'a>(&self, field: &'a Value) -> Reference<'a> {
        resolve_reference(field, &self.urls)
    }

    /// Annotation list for a field.
    pub fn annotations(&self, field: &Value) -> Vec<String> {
        annotate(field, &self.config.schema_name, &self.urls)
    }

    /// Annotation comment block for a field, or a line break.
    pub fn field_associations(&self, field: &Value) -> String {
        format_annotations(&self.annotations(field))
    }

    /// Extract URL components with the named template.
    pub fn extract_url(&self, url: &str, template: &str) -> Option<UriMatch> {
        self.urls.extract(url, template)
    }
}

/// The tree's `properties` map, checked for shape.
///
/// # Errors
///
/// Returns `SchemaError::NotAnObject` if `properties` is present but not an
/// object, or if any property value is not an object.
pub(crate) fn properties(tree: &Value) -> Result<Option<&Map<String, Value>>, SchemaError> {
    let Some(properties) = tree.get("properties") else {
        return Ok(None);
    };
    let path = pointer_join("", "properties");
    let map = properties.as_object().ok_or_else(|| SchemaError::NotAnObject {
        path: path.clone(),
        actual: json_type_name(properties).to_string(),
    })?;
    for (name, field) in map {
        if !field.is_object() {
            return Err(SchemaError::NotAnObject {
                path: pointer_join(&path, name),
                actual: json_type_name(field).to_string(),
            });
        }
    }
    Ok(Some(map))
}

fn into_object(tree: Value) -> Result<Map<String, Value>, SchemaError> {
    match tree {
        Value::Object(map) => Ok(map),
        other => Err(SchemaError::NotAnObject {
            path: String::new(),
            actual: json_type_name(&other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> Engine {
        Engine::new(Config::new("minimal")).unwrap()
    }

    #[test]
    fn add_title_uses_schema_name() {
        let result = engine().add_title(json!({})).unwrap();
        assert_eq!(result["title"], "Minimal");

        let result = engine().add_title(json!({ "title": "Other" })).unwrap();
        assert_eq!(result["title"], "Minimal");
    }

    #[test]
    fn add_schema_url_defaults() {
        let result = engine().add_schema_url(json!({})).unwrap();
        assert_eq!(result["schema"], "http://json-schema.org/schema#");
    }

    #[test]
    fn add_schema_url_keeps_original() {
        let result = engine()
            .add_schema_url(json!({ "schema": "original_schema" }))
            .unwrap();
        assert_eq!(result["schema"], "original_schema");
    }

    #[test]
    fn run_tracks_dependencies() {
        let mut engine = engine();
        engine
            .run(&json!({
                "dependencies": {
                    "postOfficeBox": ["streetAddress"],
                    "extendedAddress": ["streetAddress"]
                },
                "properties": {}
            }))
            .unwrap();
        assert_eq!(
            engine.dependencies().dependents("street_address").unwrap(),
            ["post_office_box", "extended_address"]
        );
    }

    #[test]
    fn repeated_runs_do_not_duplicate_dependents() {
        let mut engine = engine();
        let document = json!({
            "dependencies": { "a": ["owner"] },
            "properties": { "owner": { "type": "string" } }
        });
        engine.run(&document).unwrap();
        let output = engine
            .generate(&document, &crate::render::MongoidRenderer)
            .unwrap()
            .unwrap();

        assert_eq!(engine.dependencies().dependents("owner").unwrap(), ["a"]);
        assert!(output.contains("  # :owner dependents: a\n"));
    }

    #[test]
    fn generate_rejects_non_object_properties() {
        let mut engine = engine();
        let result = engine.generate(
            &json!({ "properties": ["foo", "bar"] }),
            &crate::render::MongoidRenderer,
        );
        assert!(matches!(
            result,
            Err(SchemaError::NotAnObject { ref path, ref actual }) if path == "/properties" && actual == "array"
        ));
    }

    #[test]
    fn generate_rejects_non_object_property_value() {
        let mut engine = engine();
        let result = engine.generate(
            &json!({ "properties": { "foo": true } }),
            &crate::render::MongoidRenderer,
        );
        assert!(matches!(
            result,
            Err(SchemaError::NotAnObject { ref path, ref actual }) if path == "/properties/foo" && actual == "boolean"
        ));
    }

    #[test]
    fn fresh_engine_has_no_dependencies() {
        assert!(engine().dependencies().is_empty());
    }

    #[test]
    fn add_dependencies_directly() {
        let mut engine = engine();
        engine.add_dependencies("dependent_one", &["dependency_one"]);
        engine.add_dependencies("dependent_two", &["dependency_one"]);
        assert_eq!(
            engine.dependencies().dependents("dependency_one").unwrap(),
            ["dependent_one", "dependent_two"]
        );
    }

    #[test]
    fn query_surface() {
        let engine = engine();
        let field = json!({ "type": "string", "description": "Name" });
        assert_eq!(engine.field_type(&field).mapped(), Some("String"));
        assert_eq!(
            engine.field_associations(&field),
            "\n  # field description: Name\n"
        );
        let found = engine.extract_url("http://x/#/definitions/foo", "reference").unwrap();
        assert_eq!(found.fragments().unwrap(), ["/definitions/foo"]);
        assert_eq!(
            engine.field_reference(&json!({ "ref": "http://x/#/definitions/foo" })),
            Reference::Resolved("foo".into())
        );
    }

    #[test]
    fn invalid_template_fails_construction() {
        let mut config = Config::new("bad");
        config
            .url_templates
            .insert("reference".into(), "{scheme".into());
        assert!(matches!(
            Engine::new(config),
            Err(SchemaError::InvalidTemplate { .. })
        ));
    }
}
