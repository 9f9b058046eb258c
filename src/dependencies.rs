//! Field dependency tracking.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Dependency owner to the fields that depend on it.
///
/// Indexed by dependency rather than dependent: several fields may point at
/// the same owner, and the owner resolves all of them in one lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    owners: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` depends on every entry of `dependencies`.
    pub fn add<S: AsRef<str>>(&mut self, dependent: &str, dependencies: &[S]) {
        for dependency in dependencies {
            tracing::debug!(dependent, dependency = dependency.as_ref(), "dependency added");
            self.owners
                .entry(dependency.as_ref().to_string())
                .or_default()
                .push(dependent.to_string());
        }
    }

    /// Record every property dependency of a schema's `dependencies` object.
    ///
    /// Only list-form entries (`"a": ["b", "c"]`) are tracked; schema-form
    /// entries are ignored.
    pub fn track(&mut self, dependencies: &Value) {
        let Some(entries) = dependencies.as_object() else {
            return;
        };
        for (dependent, value) in entries {
            let Some(list) = value.as_array() else {
                continue;
            };
            let names: Vec<&str> = list.iter().filter_map(Value::as_str).collect();
            self.add(dependent, &names);
        }
    }

    /// Read-only view of the owner map.
    pub fn all(&self) -> &IndexMap<String, Vec<String>> {
        &self.owners
    }

    /// Dependents recorded for `owner`.
    pub fn dependents(&self, owner: &str) -> Option<&[String]> {
        self.owners.get(owner).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
