//! # playtrack-plugin
//!
//! Plugin framework for Playtrack. Provides:
//!
//! - The plugin contract (`Plugin`, `Capability`) and runtime validation
//! - A failure boundary around every call into plugin code
//! - The engine instance (`Framework`): registration, metadata
//!   distribution, publish/dispatch, and the bounded event journal
//! - The bootstrap registry that connects engines and plugin factories
//!   regardless of which is created first
//! - Runtime-assembled plugins built from individual callbacks

pub mod bootstrap;
pub mod contract;
pub mod dynamic;
pub mod error;
pub mod framework;
pub mod journal;
pub mod prelude;
pub mod registry;
pub mod safety;

pub use bootstrap::{BootstrapRegistry, RegistrationHandle, register_plugin_factory};
pub use contract::{Capability, CapabilitySet, Plugin, PluginFactory, validate_plugin};
pub use dynamic::CallbackPlugin;
pub use error::RegistrationError;
pub use framework::{Framework, FrameworkBuilder, FrameworkHandle};
pub use journal::RecordingState;
