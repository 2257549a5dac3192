//! Engine instance. Owns the live plugin registry and the event journal,
//! and runs the publish/dispatch algorithm.
//!
//! Dispatch is synchronous: `publish_event` returns only after every active
//! plugin has been attempted, in registration order. No lock is held while
//! plugin code runs, so a plugin may publish back into its engine; each
//! publish dispatches to the active-plugin list as it was when that publish
//! started.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use playtrack_core::config::framework::FrameworkConfig;
use playtrack_core::events::{EventCatalog, RecordedEvent, normalize_params};
use playtrack_core::types::FrameworkId;

use crate::bootstrap::{BootstrapRegistry, RegistrationHandle};
use crate::contract::{Capability, Plugin, PluginFactory, validate_plugin};
use crate::error::RegistrationError;
use crate::journal::{EventJournal, RecordOutcome, RecordingState};
use crate::registry::{PluginRecord, PluginRegistry};
use crate::safety::{describe, guard, safe_call};

/// State shared between an engine, its bootstrap registration handle, and
/// the handles given to its plugins.
pub(crate) struct FrameworkShared {
    id: FrameworkId,
    config: FrameworkConfig,
    catalog: EventCatalog,
    registry: RwLock<PluginRegistry>,
    journal: Mutex<EventJournal>,
    metadata: RwLock<Option<Map<String, Value>>>,
    publishing: AtomicBool,
    destroyed: AtomicBool,
    id_cursor: AtomicUsize,
}

impl FrameworkShared {
    fn new(config: FrameworkConfig, catalog: EventCatalog) -> Self {
        let journal = EventJournal::new(config.max_recorded_events, config.record_on_start);
        Self {
            id: FrameworkId::new(),
            config,
            catalog,
            registry: RwLock::new(PluginRegistry::new()),
            journal: Mutex::new(journal),
            metadata: RwLock::new(None),
            publishing: AtomicBool::new(true),
            destroyed: AtomicBool::new(false),
            id_cursor: AtomicUsize::new(0),
        }
    }

    pub(crate) fn id(&self) -> FrameworkId {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub(crate) fn register_plugin(self: &Arc<Self>, factory: &PluginFactory) -> Option<String> {
        match self.try_register_plugin(factory) {
            Ok(id) => Some(id),
            Err(e) => {
                error!(
                    framework = %self.id,
                    identity = e.identity().unwrap_or("<none>"),
                    error = %e,
                    "Plugin registration aborted"
                );
                None
            }
        }
    }

    fn try_register_plugin(
        self: &Arc<Self>,
        factory: &PluginFactory,
    ) -> Result<String, RegistrationError> {
        if self.is_destroyed() {
            return Err(RegistrationError::Destroyed);
        }

        let handle = FrameworkHandle {
            shared: Arc::downgrade(self),
        };
        let instance = match guard("construct", || factory.construct(handle)) {
            Ok(Ok(instance)) => instance,
            Ok(Err(e)) => {
                return Err(RegistrationError::Construction {
                    factory: factory.label().to_string(),
                    reason: e.to_string(),
                });
            }
            Err(reason) => {
                return Err(RegistrationError::Construction {
                    factory: factory.label().to_string(),
                    reason,
                });
            }
        };

        if !validate_plugin(instance.as_ref()) {
            return Err(RegistrationError::Validation {
                factory: factory.label().to_string(),
            });
        }

        safe_call(instance.as_ref(), Capability::Init, |p| p.init());

        let metadata = self.metadata.read().clone();
        if let Some(metadata) = metadata {
            deliver_metadata(instance.as_ref(), &metadata);
        }

        let name = safe_call(instance.as_ref(), Capability::GetName, |p| Ok(p.name()));
        let version = safe_call(instance.as_ref(), Capability::GetVersion, |p| Ok(p.version()));
        let (name, version) = match (name, version) {
            (Some(name), Some(version)) => (name, version),
            (name, _) => {
                release_unadmitted(instance.as_ref());
                return Err(RegistrationError::Identity { name });
            }
        };

        let counter = self.id_cursor.fetch_add(1, Ordering::SeqCst);
        let id = format!("{counter}_{name}_{version}");
        if counter + 1 > self.config.plugin_id_ceiling {
            warn!(
                framework = %self.id,
                plugin_id = %id,
                minted = counter + 1,
                ceiling = self.config.plugin_id_ceiling,
                "Plugin id ceiling exceeded; check for a registration loop"
            );
        }

        let inserted = self.registry.write().insert(PluginRecord {
            id: id.clone(),
            factory: factory.clone(),
            instance: instance.clone(),
            active: true,
        });
        if let Err(e) = inserted {
            release_unadmitted(instance.as_ref());
            return Err(e);
        }

        safe_call(instance.as_ref(), Capability::SetPluginId, |p| {
            p.set_plugin_id(&id);
            Ok(())
        });

        info!(
            framework = %self.id,
            plugin_id = %id,
            name = %name,
            version = %version,
            "Plugin registered"
        );

        Ok(id)
    }

    fn unregister_plugin(&self, id: &str) -> bool {
        let removed = self.registry.write().remove(id);
        match removed {
            Some(record) => {
                safe_call(record.instance.as_ref(), Capability::Destroy, |p| p.destroy());
                info!(framework = %self.id, plugin_id = %id, "Plugin unregistered");
                true
            }
            None => false,
        }
    }

    fn set_plugin_metadata(&self, metadata: Value) -> bool {
        let Value::Object(map) = metadata else {
            error!(
                framework = %self.id,
                "Plugin metadata rejected: expected an object keyed by plugin name"
            );
            return false;
        };

        let previous = self.metadata.write().replace(map.clone());
        if previous.is_some() {
            warn!(framework = %self.id, "Plugin metadata was already set; overwriting");
        }

        let plugins = self.registry.read().all_plugins();
        for plugin in &plugins {
            deliver_metadata(plugin.as_ref(), &map);
        }
        debug!(
            framework = %self.id,
            plugins = plugins.len(),
            "Plugin metadata distributed"
        );
        true
    }

    fn publish_event(&self, event_name: &str, params: Value) -> bool {
        if self.is_destroyed() || !self.publishing.load(Ordering::SeqCst) {
            return false;
        }

        if !self.catalog.contains(event_name) {
            warn!(framework = %self.id, event = %event_name, "Ignoring unknown event");
            return false;
        }

        let params = normalize_params(params);

        let (outcome, capacity) = {
            let mut journal = self.journal.lock();
            let outcome = journal.record(RecordedEvent::now(event_name, params.clone()));
            (outcome, journal.capacity())
        };
        if outcome == RecordOutcome::CapacityReached {
            info!(
                framework = %self.id,
                capacity,
                "Event journal full; recording stopped"
            );
        }

        let plugins = self.registry.read().active_plugins();
        for plugin in &plugins {
            safe_call(plugin.as_ref(), Capability::ProcessEvent, |p| {
                p.process_event(event_name, &params)
            });
        }

        true
    }

    fn recorded_events(&self) -> Vec<RecordedEvent> {
        self.journal.lock().snapshot()
    }

    fn teardown_plugins(&self) {
        let records = self.registry.write().drain();
        for record in &records {
            safe_call(record.instance.as_ref(), Capability::Destroy, |p| p.destroy());
            debug!(framework = %self.id, plugin_id = %record.id, "Plugin destroyed");
        }
    }

    fn clear_state(&self) {
        let mut journal = self.journal.lock();
        journal.flush();
        journal.stop();
        drop(journal);
        *self.metadata.write() = None;
    }
}

/// Tear down a plugin that was initialized but then refused admission.
fn release_unadmitted(plugin: &dyn Plugin) {
    safe_call(plugin, Capability::Destroy, |p| p.destroy());
}

/// Push `plugin`'s slice of `metadata`, keyed by the plugin's name.
fn deliver_metadata(plugin: &dyn Plugin, metadata: &Map<String, Value>) {
    let slice = safe_call(plugin, Capability::GetName, |p| Ok(p.name()))
        .and_then(|name| metadata.get(&name).cloned());
    safe_call(plugin, Capability::SetMetadata, |p| p.set_metadata(slice));
}

/// The narrow view of an engine given to plugin factories.
///
/// Holds a weak reference: once the engine is gone every call returns an
/// empty result.
#[derive(Clone)]
pub struct FrameworkHandle {
    shared: Weak<FrameworkShared>,
}

impl FrameworkHandle {
    /// A handle that is not attached to any engine.
    pub fn detached() -> Self {
        Self {
            shared: Weak::new(),
        }
    }

    /// The journal as it is now, for replaying events published before this
    /// plugin was registered.
    pub fn recorded_events(&self) -> Vec<RecordedEvent> {
        self.shared
            .upgrade()
            .map(|shared| shared.recorded_events())
            .unwrap_or_default()
    }

    /// Publish an event into the engine. Returns false if the engine is
    /// gone or rejected the event.
    pub fn publish_event(&self, event_name: &str, params: Value) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.publish_event(event_name, params))
    }

    /// Id of the engine, if it still exists.
    pub fn framework_id(&self) -> Option<FrameworkId> {
        self.shared.upgrade().map(|shared| shared.id())
    }

    /// Whether the engine still exists and has not been destroyed.
    pub fn is_alive(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| !shared.is_destroyed())
    }
}

impl std::fmt::Debug for FrameworkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameworkHandle")
            .field("framework", &self.framework_id())
            .finish()
    }
}

/// One engine instance.
///
/// Created engines join their [`BootstrapRegistry`] and immediately receive
/// every globally registered plugin factory. Dropping an engine destroys it.
pub struct Framework {
    shared: Arc<FrameworkShared>,
    bootstrap: Arc<BootstrapRegistry>,
    registration: Mutex<Option<RegistrationHandle>>,
}

impl Framework {
    /// Create an engine with the player event catalog, joined to the
    /// process-wide bootstrap registry.
    pub fn new(config: FrameworkConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Start building an engine.
    pub fn builder() -> FrameworkBuilder {
        FrameworkBuilder::default()
    }

    /// Engine instance id.
    pub fn id(&self) -> FrameworkId {
        self.shared.id
    }

    /// The catalog of legal event names.
    pub fn catalog(&self) -> &EventCatalog {
        &self.shared.catalog
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &FrameworkConfig {
        &self.shared.config
    }

    /// A plugin-facing handle to this engine.
    pub fn handle(&self) -> FrameworkHandle {
        FrameworkHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Build, validate, initialize, and admit a plugin.
    ///
    /// Returns the new plugin id, or `None` if registration was aborted
    /// (the reason is logged). The same factory may be registered many
    /// times; each registration gets a distinct id.
    pub fn register_plugin(&self, factory: &PluginFactory) -> Option<String> {
        self.shared.register_plugin(factory)
    }

    /// Like [`register_plugin`](Self::register_plugin), but returns the
    /// failure instead of logging it.
    pub fn try_register_plugin(&self, factory: &PluginFactory) -> Result<String, RegistrationError> {
        self.shared.try_register_plugin(factory)
    }

    /// Destroy and remove a plugin. Returns false if the id is unknown.
    pub fn unregister_plugin(&self, id: &str) -> bool {
        self.shared.unregister_plugin(id)
    }

    /// Registered plugin ids in registration order, active or not.
    pub fn plugin_id_list(&self) -> Vec<String> {
        self.shared.registry.read().ids()
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.shared.registry.read().len()
    }

    /// Name of a registered plugin.
    pub fn plugin_name(&self, id: &str) -> Option<String> {
        let instance = self.shared.registry.read().get(id)?.instance.clone();
        Some(describe(instance.as_ref()))
    }

    /// Whether the plugin exists and receives events.
    pub fn is_plugin_active(&self, id: &str) -> bool {
        self.shared.registry.read().is_active(id)
    }

    /// Resume dispatch to a plugin. Returns false if the id is unknown.
    pub fn make_plugin_active(&self, id: &str) -> bool {
        self.shared.registry.write().set_active(id, true)
    }

    /// Stop dispatch to a plugin without unregistering it. Returns false if
    /// the id is unknown.
    pub fn make_plugin_inactive(&self, id: &str) -> bool {
        self.shared.registry.write().set_active(id, false)
    }

    /// Store metadata keyed by plugin name and push each registered plugin
    /// its slice. Plugins registered later receive their slice during
    /// registration. Rejects anything but a JSON object.
    pub fn set_plugin_metadata(&self, metadata: Value) -> bool {
        self.shared.set_plugin_metadata(metadata)
    }

    /// Record and dispatch an event.
    ///
    /// Returns false without side effects while publishing is suspended or
    /// when `event_name` is not in the catalog. Non-array `params` are
    /// replaced by an empty sequence.
    pub fn publish_event(&self, event_name: &str, params: Value) -> bool {
        self.shared.publish_event(event_name, params)
    }

    /// Mute the pipeline. Events published while suspended are dropped.
    pub fn stop_publishing_events(&self) {
        self.shared.publishing.store(false, Ordering::SeqCst);
        info!(framework = %self.shared.id, "Event publishing suspended");
    }

    /// Unmute the pipeline.
    pub fn resume_publishing_events(&self) {
        self.shared.publishing.store(true, Ordering::SeqCst);
        info!(framework = %self.shared.id, "Event publishing resumed");
    }

    /// Whether `publish_event` currently accepts events.
    pub fn is_publishing(&self) -> bool {
        self.shared.publishing.load(Ordering::SeqCst)
    }

    /// Copy of the journal in publish order.
    pub fn recorded_events(&self) -> Vec<RecordedEvent> {
        self.shared.recorded_events()
    }

    /// Restart recording, e.g. after the journal filled up.
    pub fn start_recording_events(&self) {
        self.shared.journal.lock().start();
    }

    /// Stop recording. Existing entries are kept.
    pub fn stop_recording_events(&self) {
        self.shared.journal.lock().stop();
    }

    /// Whether new events are appended to the journal.
    pub fn is_recording(&self) -> bool {
        self.recording_state() == RecordingState::Recording
    }

    /// Current journal recording state.
    pub fn recording_state(&self) -> RecordingState {
        self.shared.journal.lock().state()
    }

    /// Drop every journal entry.
    pub fn flush_recorded_events(&self) {
        self.shared.journal.lock().flush();
    }

    /// Whether [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.shared.is_destroyed()
    }

    /// Tear the engine down: destroy every plugin, leave the bootstrap
    /// registry, and clear all state. Globally registered factories are not
    /// affected. Idempotent.
    pub fn destroy(&self) {
        if self.shared.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.shared.teardown_plugins();

        let registration = self.registration.lock().take();
        if let Some(handle) = registration {
            self.bootstrap.unregister_framework_instance(&handle);
        }

        self.shared.clear_state();
        info!(framework = %self.shared.id, "Framework destroyed");
    }

    pub(crate) fn shared(&self) -> &Arc<FrameworkShared> {
        &self.shared
    }
}

impl Drop for Framework {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framework")
            .field("id", &self.shared.id)
            .field("plugins", &self.plugin_id_list())
            .field("publishing", &self.is_publishing())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Builder for [`Framework`].
#[derive(Default)]
pub struct FrameworkBuilder {
    config: Option<FrameworkConfig>,
    catalog: Option<EventCatalog>,
    bootstrap: Option<Arc<BootstrapRegistry>>,
}

impl FrameworkBuilder {
    /// Limits and start-up state.
    pub fn config(mut self, config: FrameworkConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Legal event names. Defaults to the player taxonomy.
    pub fn catalog(mut self, catalog: EventCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Bootstrap registry to join. Defaults to the process-wide one.
    pub fn bootstrap(mut self, bootstrap: Arc<BootstrapRegistry>) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Create the engine, join the bootstrap registry, and replay every
    /// known plugin factory into it.
    pub fn build(self) -> Framework {
        let bootstrap = self
            .bootstrap
            .unwrap_or_else(|| BootstrapRegistry::global().clone());
        let shared = Arc::new(FrameworkShared::new(
            self.config.unwrap_or_default(),
            self.catalog.unwrap_or_else(EventCatalog::player_default),
        ));

        let framework = Framework {
            shared,
            bootstrap: bootstrap.clone(),
            registration: Mutex::new(None),
        };
        info!(framework = %framework.id(), "Framework created");

        let handle = bootstrap.register_framework_instance(&framework);
        *framework.registration.lock() = Some(handle);
        framework
    }
}
