//! Engine instance configuration.

use serde::{Deserialize, Serialize};

/// Limits and start-up state for a single engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkConfig {
    /// Maximum number of entries kept in the event journal. Once reached,
    /// recording stops until explicitly restarted.
    #[serde(default = "default_max_recorded_events")]
    pub max_recorded_events: usize,
    /// Soft ceiling on plugin ids minted by one engine. Exceeding it only
    /// logs a warning.
    #[serde(default = "default_plugin_id_ceiling")]
    pub plugin_id_ceiling: usize,
    /// Whether the journal records from the moment the engine is created.
    #[serde(default = "default_true")]
    pub record_on_start: bool,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            max_recorded_events: default_max_recorded_events(),
            plugin_id_ceiling: default_plugin_id_ceiling(),
            record_on_start: default_true(),
        }
    }
}

fn default_max_recorded_events() -> usize {
    500
}

fn default_plugin_id_ceiling() -> usize {
    20
}

fn default_true() -> bool {
    true
}
