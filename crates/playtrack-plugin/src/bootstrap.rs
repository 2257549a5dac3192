//! Bootstrap registry: reconciles independently created engines with
//! independently registered plugin factories.
//!
//! A factory registered here reaches every live engine and every engine
//! created later. An engine joining here receives every factory registered
//! before it. Engines are held through narrow [`RegistrationHandle`]s that can
//! only register a factory, never through the full engine.

use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;
use tracing::{debug, info};

use playtrack_core::types::FrameworkId;

use crate::contract::PluginFactory;
use crate::framework::{Framework, FrameworkShared};

static GLOBAL_BOOTSTRAP: OnceLock<Arc<BootstrapRegistry>> = OnceLock::new();

/// Register a plugin factory with the process-wide registry.
///
/// Returns how many live engines admitted it.
pub fn register_plugin_factory(factory: PluginFactory) -> usize {
    BootstrapRegistry::global().register_plugin_factory(factory)
}

/// Capability to register one plugin factory into one engine.
#[derive(Clone)]
pub struct RegistrationHandle {
    inner: Arc<HandleTarget>,
}

struct HandleTarget {
    framework_id: FrameworkId,
    target: Weak<FrameworkShared>,
}

impl RegistrationHandle {
    fn for_framework(framework: &Framework) -> Self {
        Self {
            inner: Arc::new(HandleTarget {
                framework_id: framework.id(),
                target: Arc::downgrade(framework.shared()),
            }),
        }
    }

    /// Register `factory` into the engine behind this handle. Returns the
    /// new plugin id, or `None` if the engine is gone or rejected it.
    pub fn register(&self, factory: &PluginFactory) -> Option<String> {
        self.inner
            .target
            .upgrade()
            .and_then(|shared| shared.register_plugin(factory))
    }

    /// Id of the engine this handle registers into.
    pub fn framework_id(&self) -> FrameworkId {
        self.inner.framework_id
    }

    /// Whether both handles were produced by the same registration.
    pub fn same_as(&self, other: &RegistrationHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for RegistrationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationHandle")
            .field("framework_id", &self.inner.framework_id)
            .finish()
    }
}

#[derive(Default)]
struct BootstrapState {
    instances: Vec<RegistrationHandle>,
    factories: Vec<PluginFactory>,
}

/// Process-wide coordination state for engines and plugin factories.
///
/// Use [`BootstrapRegistry::global`] for the shared instance, or create a
/// private one and pass it to [`Framework::builder`] to keep independent
/// groups of engines (e.g. separate tests) apart.
#[derive(Default)]
pub struct BootstrapRegistry {
    state: Mutex<BootstrapState>,
}

impl BootstrapRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Arc<BootstrapRegistry> {
        GLOBAL_BOOTSTRAP.get_or_init(|| Arc::new(BootstrapRegistry::new()))
    }

    /// Remember `factory` for future engines and register it into every
    /// live engine now. Returns how many engines admitted it.
    pub fn register_plugin_factory(&self, factory: PluginFactory) -> usize {
        let instances = {
            let mut state = self.state.lock();
            state.factories.push(factory.clone());
            state.instances.clone()
        };

        let admitted = instances
            .iter()
            .filter_map(|handle| handle.register(&factory))
            .count();

        info!(
            factory = %factory.label(),
            engines = instances.len(),
            admitted,
            "Plugin factory registered globally"
        );
        admitted
    }

    /// Add an engine and replay every known factory into it. Returns the
    /// handle that identifies this registration.
    pub fn register_framework_instance(&self, framework: &Framework) -> RegistrationHandle {
        let handle = RegistrationHandle::for_framework(framework);
        let factories = {
            let mut state = self.state.lock();
            state.instances.push(handle.clone());
            state.factories.clone()
        };

        for factory in &factories {
            handle.register(factory);
        }

        debug!(
            framework = %framework.id(),
            replayed = factories.len(),
            "Framework instance joined bootstrap registry"
        );
        handle
    }

    /// Remove the engine registered under `handle`. Returns false if it was
    /// not present, so repeated calls are harmless.
    pub fn unregister_framework_instance(&self, handle: &RegistrationHandle) -> bool {
        let mut state = self.state.lock();
        let before = state.instances.len();
        state.instances.retain(|h| !h.same_as(handle));
        let removed = state.instances.len() != before;
        if removed {
            debug!(
                framework = %handle.framework_id(),
                "Framework instance left bootstrap registry"
            );
        }
        removed
    }

    /// Number of live engines.
    pub fn instance_count(&self) -> usize {
        self.state.lock().instances.len()
    }

    /// Number of factories ever registered.
    pub fn factory_count(&self) -> usize {
        self.state.lock().factories.len()
    }

    /// Forget all engines and factories. Intended for test isolation when
    /// using the global registry.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.instances.clear();
        state.factories.clear();
    }
}

impl std::fmt::Debug for BootstrapRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BootstrapRegistry")
            .field("instances", &state.instances.len())
            .field("factories", &state.factories.len())
            .finish()
    }
}
