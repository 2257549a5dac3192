//! Console logging plugin for Playtrack.
//!
//! Logs every dispatched playback event through `tracing` and keeps
//! per-event counters. On `init` it replays the engine journal, so it reports
//! the whole session even when registered after playback started.

pub mod plugin;
pub mod stats;

pub use plugin::{ConsoleLoggerPlugin, PLUGIN_NAME, PLUGIN_VERSION};
pub use stats::SessionStats;
