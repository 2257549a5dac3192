//! Player events: the taxonomy of legal names, the flattened catalog used
//! for membership checks, and the journal entry type.

pub mod catalog;
pub mod recorded;
pub mod taxonomy;

pub use catalog::EventCatalog;
pub use recorded::RecordedEvent;

use serde_json::Value;

/// Normalise publish parameters to an ordered sequence.
///
/// Arrays pass through; every other value becomes an empty sequence so that
/// plugins never receive a bare scalar.
pub fn normalize_params(params: Value) -> Vec<Value> {
    match params {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}
