//! Plugin contract: the capabilities every observer must implement, the
//! factory type that builds plugins, and the runtime conformance check.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use playtrack_core::result::PlaytrackResult;

use crate::framework::FrameworkHandle;
use crate::safety::guard;

/// One named member of the plugin contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// `getName() -> string`
    GetName,
    /// `getVersion() -> string`
    GetVersion,
    /// `setPluginID(id)`
    SetPluginId,
    /// `getPluginID() -> string`
    GetPluginId,
    /// `init()`
    Init,
    /// `setMetadata(metadata)`
    SetMetadata,
    /// `destroy()`
    Destroy,
    /// `processEvent(eventName, params)`
    ProcessEvent,
}

/// Every capability a plugin must expose to be admitted.
pub const REQUIRED_CAPABILITIES: [Capability; 8] = [
    Capability::GetName,
    Capability::GetVersion,
    Capability::SetPluginId,
    Capability::GetPluginId,
    Capability::Init,
    Capability::SetMetadata,
    Capability::Destroy,
    Capability::ProcessEvent,
];

impl Capability {
    /// Contract name of the capability, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetName => "getName",
            Self::GetVersion => "getVersion",
            Self::SetPluginId => "setPluginID",
            Self::GetPluginId => "getPluginID",
            Self::Init => "init",
            Self::SetMetadata => "setMetadata",
            Self::Destroy => "destroy",
            Self::ProcessEvent => "processEvent",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capabilities a plugin value actually exposes.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    /// No capabilities.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every required capability.
    pub fn all() -> Self {
        REQUIRED_CAPABILITIES.into_iter().collect()
    }

    /// Whether `capability` is present.
    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Add a capability.
    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    /// Remove a capability.
    pub fn remove(&mut self, capability: Capability) {
        self.0 &= !capability.bit();
    }

    /// Required capabilities absent from this set, in contract order.
    pub fn missing(&self) -> Vec<Capability> {
        REQUIRED_CAPABILITIES
            .into_iter()
            .filter(|c| !self.contains(*c))
            .collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = Self::empty();
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(
                REQUIRED_CAPABILITIES
                    .iter()
                    .filter(|c| self.contains(**c))
                    .map(Capability::as_str),
            )
            .finish()
    }
}

/// Trait that all plugins must implement.
///
/// Methods take `&self`; plugins keep their own state behind interior
/// mutability so the framework can call them while a plugin publishes
/// back into the engine.
pub trait Plugin: Send + Sync {
    /// Plugin name. Also the key used to pick this plugin's metadata slice.
    fn name(&self) -> String;

    /// Plugin version string.
    fn version(&self) -> String;

    /// Receive the id assigned by the engine.
    fn set_plugin_id(&self, id: &str);

    /// The id previously assigned, if any.
    fn plugin_id(&self) -> Option<String>;

    /// Called once, right after the plugin passes validation.
    fn init(&self) -> PlaytrackResult<()>;

    /// Receive this plugin's slice of the engine metadata. `None` when the
    /// metadata has no entry for this plugin's name.
    fn set_metadata(&self, metadata: Option<Value>) -> PlaytrackResult<()>;

    /// Called exactly once when the plugin is removed from its engine.
    fn destroy(&self) -> PlaytrackResult<()>;

    /// Handle one published event.
    fn process_event(&self, event_name: &str, params: &[Value]) -> PlaytrackResult<()>;

    /// The capabilities this value actually provides. Statically typed
    /// plugins provide all of them.
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::all()
    }
}

type BuildFn = dyn Fn(FrameworkHandle) -> PlaytrackResult<Arc<dyn Plugin>> + Send + Sync;

/// Builds plugin instances for an engine.
///
/// Cloning a factory is cheap; clones build the same kind of plugin.
#[derive(Clone)]
pub struct PluginFactory {
    label: Arc<str>,
    build: Arc<BuildFn>,
}

impl PluginFactory {
    /// Create a factory from a constructor closure. `label` only appears in
    /// diagnostics; the plugin's own name is what the engine uses.
    pub fn new<F, P>(label: impl Into<String>, build: F) -> Self
    where
        F: Fn(FrameworkHandle) -> PlaytrackResult<P> + Send + Sync + 'static,
        P: Plugin + 'static,
    {
        Self {
            label: Arc::from(label.into()),
            build: Arc::new(move |handle| build(handle).map(|p| Arc::new(p) as Arc<dyn Plugin>)),
        }
    }

    /// The diagnostic label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Build one plugin instance.
    pub fn construct(&self, handle: FrameworkHandle) -> PlaytrackResult<Arc<dyn Plugin>> {
        (self.build)(handle)
    }

    /// Whether two factories are clones of each other.
    pub fn same_as(&self, other: &PluginFactory) -> bool {
        Arc::ptr_eq(&self.build, &other.build)
    }
}

impl fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginFactory")
            .field("label", &self.label)
            .field("build", &"<closure>")
            .finish()
    }
}

/// Check that a candidate satisfies the plugin contract.
///
/// Fails when a required capability is missing, or when `name()` or
/// `version()` panics or returns an empty string. Never panics and never
/// mutates the candidate; failures are logged.
pub fn validate_plugin(candidate: &dyn Plugin) -> bool {
    let capabilities = match guard("capabilities", || candidate.capabilities()) {
        Ok(capabilities) => capabilities,
        Err(reason) => {
            warn!(reason = %reason, "Plugin validation failed: capability query panicked");
            return false;
        }
    };

    if let Some(missing) = capabilities.missing().first() {
        warn!(
            capability = %missing,
            "Plugin validation failed: required capability is missing"
        );
        return false;
    }

    let name = match guard(Capability::GetName.as_str(), || candidate.name()) {
        Ok(name) if !name.is_empty() => name,
        Ok(_) => {
            warn!("Plugin validation failed: getName returned an empty name");
            return false;
        }
        Err(reason) => {
            warn!(reason = %reason, "Plugin validation failed: getName panicked");
            return false;
        }
    };

    match guard(Capability::GetVersion.as_str(), || candidate.version()) {
        Ok(version) if !version.is_empty() => true,
        Ok(_) => {
            warn!(plugin = %name, "Plugin validation failed: getVersion returned an empty version");
            false
        }
        Err(reason) => {
            warn!(plugin = %name, reason = %reason, "Plugin validation failed: getVersion panicked");
            false
        }
    }
}
