//! Failure boundary around plugin code.
//!
//! After registration the engine only reaches plugin code through
//! [`safe_call`]. A capability that returns an error or panics is logged and
//! reported as `None`; the engine and every other plugin keep running.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, error};

use playtrack_core::result::PlaytrackResult;

use crate::contract::{Capability, Plugin};

const UNKNOWN_PLUGIN: &str = "<unknown>";

/// Extract a human-readable message from a panic payload.
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

/// Run `f`, converting a panic into `Err` with a message naming `op`.
pub fn guard<T>(op: &str, f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| format!("panic in `{op}`: {}", panic_message(payload)))
}

/// Best-effort plugin name for diagnostics. Never panics.
pub fn describe(plugin: &dyn Plugin) -> String {
    let has_name = guard("capabilities", || plugin.capabilities())
        .map(|caps| caps.contains(Capability::GetName))
        .unwrap_or(false);
    if !has_name {
        return UNKNOWN_PLUGIN.to_string();
    }

    match guard(Capability::GetName.as_str(), || plugin.name()) {
        Ok(name) if !name.is_empty() => name,
        _ => UNKNOWN_PLUGIN.to_string(),
    }
}

/// Invoke one contract capability on `plugin` inside the failure boundary.
///
/// Returns `None` when the capability is absent, returns an error, or
/// panics; otherwise the capability's return value.
pub fn safe_call<R>(
    plugin: &dyn Plugin,
    capability: Capability,
    call: impl FnOnce(&dyn Plugin) -> PlaytrackResult<R>,
) -> Option<R> {
    let present = guard("capabilities", || plugin.capabilities())
        .map(|caps| caps.contains(capability))
        .unwrap_or(false);
    if !present {
        debug!(
            plugin = %describe(plugin),
            capability = %capability,
            "Skipping call to absent plugin capability"
        );
        return None;
    }

    match guard(capability.as_str(), || call(plugin)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            error!(
                plugin = %describe(plugin),
                capability = %capability,
                error = %e,
                "Plugin capability returned an error"
            );
            None
        }
        Err(reason) => {
            error!(
                plugin = %describe(plugin),
                capability = %capability,
                reason = %reason,
                "Plugin capability panicked"
            );
            None
        }
    }
}
