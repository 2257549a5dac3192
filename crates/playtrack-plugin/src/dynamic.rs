//! Plugins assembled at runtime from individual callbacks.
//!
//! A [`CallbackPlugin`] only advertises the capabilities it was given, so a
//! plugin supplied by a script host or a configuration file can be missing
//! members of the contract. Validation catches that before admission.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use playtrack_core::result::PlaytrackResult;

use crate::contract::{Capability, CapabilitySet, Plugin};

type TextFn = Arc<dyn Fn() -> String + Send + Sync>;
type LifecycleFn = Arc<dyn Fn() -> PlaytrackResult<()> + Send + Sync>;
type MetadataFn = Arc<dyn Fn(Option<Value>) -> PlaytrackResult<()> + Send + Sync>;
type EventFn = Arc<dyn Fn(&str, &[Value]) -> PlaytrackResult<()> + Send + Sync>;

/// A plugin whose capabilities are individual closures.
pub struct CallbackPlugin {
    name: Option<TextFn>,
    version: Option<TextFn>,
    init: Option<LifecycleFn>,
    set_metadata: Option<MetadataFn>,
    destroy: Option<LifecycleFn>,
    process_event: Option<EventFn>,
    stores_id: bool,
    reports_id: bool,
    plugin_id: Mutex<Option<String>>,
}

impl CallbackPlugin {
    /// Start an empty builder: no capabilities at all.
    pub fn builder() -> CallbackPluginBuilder {
        CallbackPluginBuilder::default()
    }

    /// Start a builder with every capability present; lifecycle and event
    /// callbacks are no-ops.
    pub fn complete(name: impl Into<String>, version: impl Into<String>) -> CallbackPluginBuilder {
        Self::builder()
            .name(name)
            .version(version)
            .track_plugin_id()
            .on_init(|| Ok(()))
            .on_metadata(|_| Ok(()))
            .on_destroy(|| Ok(()))
            .on_event(|_, _| Ok(()))
    }
}

impl Plugin for CallbackPlugin {
    fn name(&self) -> String {
        self.name.as_ref().map(|f| f()).unwrap_or_default()
    }

    fn version(&self) -> String {
        self.version.as_ref().map(|f| f()).unwrap_or_default()
    }

    fn set_plugin_id(&self, id: &str) {
        if self.stores_id {
            *self.plugin_id.lock() = Some(id.to_string());
        }
    }

    fn plugin_id(&self) -> Option<String> {
        if self.reports_id {
            self.plugin_id.lock().clone()
        } else {
            None
        }
    }

    fn init(&self) -> PlaytrackResult<()> {
        self.init.as_ref().map_or(Ok(()), |f| f())
    }

    fn set_metadata(&self, metadata: Option<Value>) -> PlaytrackResult<()> {
        self.set_metadata.as_ref().map_or(Ok(()), |f| f(metadata))
    }

    fn destroy(&self) -> PlaytrackResult<()> {
        self.destroy.as_ref().map_or(Ok(()), |f| f())
    }

    fn process_event(&self, event_name: &str, params: &[Value]) -> PlaytrackResult<()> {
        self.process_event
            .as_ref()
            .map_or(Ok(()), |f| f(event_name, params))
    }

    fn capabilities(&self) -> CapabilitySet {
        let mut set = CapabilitySet::empty();
        let present = [
            (Capability::GetName, self.name.is_some()),
            (Capability::GetVersion, self.version.is_some()),
            (Capability::SetPluginId, self.stores_id),
            (Capability::GetPluginId, self.reports_id),
            (Capability::Init, self.init.is_some()),
            (Capability::SetMetadata, self.set_metadata.is_some()),
            (Capability::Destroy, self.destroy.is_some()),
            (Capability::ProcessEvent, self.process_event.is_some()),
        ];
        for (capability, available) in present {
            if available {
                set.insert(capability);
            }
        }
        set
    }
}

impl fmt::Debug for CallbackPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackPlugin")
            .field("capabilities", &self.capabilities())
            .field("plugin_id", &*self.plugin_id.lock())
            .finish()
    }
}

/// Builder for [`CallbackPlugin`].
#[derive(Default)]
pub struct CallbackPluginBuilder {
    name: Option<TextFn>,
    version: Option<TextFn>,
    init: Option<LifecycleFn>,
    set_metadata: Option<MetadataFn>,
    destroy: Option<LifecycleFn>,
    process_event: Option<EventFn>,
    stores_id: bool,
    reports_id: bool,
    removed: Vec<Capability>,
}

impl CallbackPluginBuilder {
    /// Fixed plugin name.
    pub fn name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name_with(move || name.clone())
    }

    /// Plugin name computed on every call.
    pub fn name_with(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.name = Some(Arc::new(f));
        self
    }

    /// Fixed plugin version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = Some(Arc::new(move || version.clone()));
        self
    }

    /// Store and report the engine-assigned id.
    pub fn track_plugin_id(mut self) -> Self {
        self.stores_id = true;
        self.reports_id = true;
        self
    }

    /// `init` callback.
    pub fn on_init(mut self, f: impl Fn() -> PlaytrackResult<()> + Send + Sync + 'static) -> Self {
        self.init = Some(Arc::new(f));
        self
    }

    /// `setMetadata` callback.
    pub fn on_metadata(
        mut self,
        f: impl Fn(Option<Value>) -> PlaytrackResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.set_metadata = Some(Arc::new(f));
        self
    }

    /// `destroy` callback.
    pub fn on_destroy(mut self, f: impl Fn() -> PlaytrackResult<()> + Send + Sync + 'static) -> Self {
        self.destroy = Some(Arc::new(f));
        self
    }

    /// `processEvent` callback.
    pub fn on_event(
        mut self,
        f: impl Fn(&str, &[Value]) -> PlaytrackResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.process_event = Some(Arc::new(f));
        self
    }

    /// Drop a capability from the built plugin, whatever was configured.
    pub fn without(mut self, capability: Capability) -> Self {
        self.removed.push(capability);
        self
    }

    /// Undo an earlier [`without`](Self::without).
    pub fn restore(mut self, capability: Capability) -> Self {
        self.removed.retain(|c| *c != capability);
        self
    }

    /// Build the plugin.
    pub fn build(self) -> CallbackPlugin {
        let removed = |c: Capability| self.removed.contains(&c);
        CallbackPlugin {
            name: self.name.clone().filter(|_| !removed(Capability::GetName)),
            version: self.version.clone().filter(|_| !removed(Capability::GetVersion)),
            init: self.init.clone().filter(|_| !removed(Capability::Init)),
            set_metadata: self
                .set_metadata
                .clone()
                .filter(|_| !removed(Capability::SetMetadata)),
            destroy: self.destroy.clone().filter(|_| !removed(Capability::Destroy)),
            process_event: self
                .process_event
                .clone()
                .filter(|_| !removed(Capability::ProcessEvent)),
            stores_id: self.stores_id && !removed(Capability::SetPluginId),
            reports_id: self.reports_id && !removed(Capability::GetPluginId),
            plugin_id: Mutex::new(None),
        }
    }
}
