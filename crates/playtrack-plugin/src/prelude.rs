//! Convenience re-exports for plugin authors.

pub use crate::contract::{Capability, CapabilitySet, Plugin, PluginFactory};
pub use crate::framework::FrameworkHandle;
pub use playtrack_core::error::PlaytrackError;
pub use playtrack_core::events::RecordedEvent;
pub use playtrack_core::result::PlaytrackResult;
pub use serde_json::Value;
