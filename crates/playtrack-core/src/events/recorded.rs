//! Journal entries.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An immutable record of one published event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEvent {
    /// Publish time in epoch milliseconds.
    pub timestamp: i64,
    /// The published event name.
    pub event_name: String,
    /// The normalised parameter sequence.
    pub params: Vec<Value>,
}

impl RecordedEvent {
    /// Record an event at the current time.
    pub fn now(event_name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            event_name: event_name.into(),
            params,
        }
    }
}
