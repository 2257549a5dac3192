//! Flattened set of legal event names.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use super::taxonomy;

/// Fast membership test over every leaf string of an event taxonomy.
///
/// Built once per engine instance and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    names: HashSet<String>,
}

impl EventCatalog {
    /// Flatten a (possibly nested) taxonomy object into its leaf strings.
    ///
    /// Objects and arrays are walked recursively; non-string leaves are
    /// ignored.
    pub fn from_taxonomy(taxonomy: &Value) -> Self {
        let mut names = HashSet::new();
        collect_leaves(taxonomy, &mut names);
        debug!(event_count = names.len(), "Event catalog built");
        Self { names }
    }

    /// Catalog for the built-in video player taxonomy.
    pub fn player_default() -> Self {
        Self::from_taxonomy(&taxonomy::default_taxonomy())
    }

    /// Whether `event_name` is a legal event.
    pub fn contains(&self, event_name: &str) -> bool {
        self.names.contains(event_name)
    }

    /// Number of legal events.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog has no events.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn collect_leaves(value: &Value, out: &mut HashSet<String>) {
    match value {
        Value::String(name) => {
            out.insert(name.clone());
        }
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        _ => {}
    }
}
