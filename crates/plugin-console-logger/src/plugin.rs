//! Console logger plugin implementation.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use playtrack_plugin::prelude::*;

use crate::stats::SessionStats;

/// Name under which this plugin registers and looks up its metadata.
pub const PLUGIN_NAME: &str = "console_logger";
/// Plugin version.
pub const PLUGIN_VERSION: &str = "1.0.0";

/// Settings read from this plugin's metadata slice.
#[derive(Debug, Clone, Default, Deserialize)]
struct LoggerSettings {
    /// Log event parameters at info level instead of debug.
    #[serde(default)]
    verbose: bool,
    /// Event names to skip entirely.
    #[serde(default)]
    ignore: Vec<String>,
}

/// Logs playback events and counts them.
pub struct ConsoleLoggerPlugin {
    handle: FrameworkHandle,
    stats: Arc<SessionStats>,
    plugin_id: Mutex<Option<String>>,
    settings: Mutex<LoggerSettings>,
}

impl ConsoleLoggerPlugin {
    /// Create a logger attached to an engine.
    pub fn new(handle: FrameworkHandle, stats: Arc<SessionStats>) -> Self {
        Self {
            handle,
            stats,
            plugin_id: Mutex::new(None),
            settings: Mutex::new(LoggerSettings::default()),
        }
    }

    /// Factory whose instances all count into `stats`.
    pub fn factory(stats: Arc<SessionStats>) -> PluginFactory {
        PluginFactory::new(PLUGIN_NAME, move |handle| {
            Ok(ConsoleLoggerPlugin::new(handle, stats.clone()))
        })
    }

    fn observe(&self, event_name: &str, params: &[Value], replayed: bool) {
        let settings = self.settings.lock().clone();
        if settings.ignore.iter().any(|ignored| ignored == event_name) {
            return;
        }

        self.stats.record(event_name, replayed);

        let plugin_id = self.plugin_id.lock().clone().unwrap_or_default();
        if settings.verbose {
            info!(
                plugin_id = %plugin_id,
                event = %event_name,
                replayed,
                params = ?params,
                "Playback event"
            );
        } else {
            debug!(plugin_id = %plugin_id, event = %event_name, replayed, "Playback event");
        }
    }
}

impl Plugin for ConsoleLoggerPlugin {
    fn name(&self) -> String {
        PLUGIN_NAME.to_string()
    }

    fn version(&self) -> String {
        PLUGIN_VERSION.to_string()
    }

    fn set_plugin_id(&self, id: &str) {
        *self.plugin_id.lock() = Some(id.to_string());
    }

    fn plugin_id(&self) -> Option<String> {
        self.plugin_id.lock().clone()
    }

    fn init(&self) -> PlaytrackResult<()> {
        let backlog = self.handle.recorded_events();
        for event in &backlog {
            self.observe(&event.event_name, &event.params, true);
        }
        debug!(replayed = backlog.len(), "Console logger initialized");
        Ok(())
    }

    fn set_metadata(&self, metadata: Option<Value>) -> PlaytrackResult<()> {
        let settings = match metadata {
            Some(value) => serde_json::from_value(value)?,
            None => LoggerSettings::default(),
        };
        *self.settings.lock() = settings;
        Ok(())
    }

    fn destroy(&self) -> PlaytrackResult<()> {
        info!(
            plugin_id = %self.plugin_id.lock().clone().unwrap_or_default(),
            live = self.stats.live(),
            replayed = self.stats.replayed(),
            "Console logger shutting down"
        );
        Ok(())
    }

    fn process_event(&self, event_name: &str, params: &[Value]) -> PlaytrackResult<()> {
        self.observe(event_name, params, false);
        Ok(())
    }
}
