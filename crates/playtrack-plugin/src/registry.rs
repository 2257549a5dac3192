//! The live plugin records of one engine instance, kept in registration
//! order.

use std::sync::Arc;

use crate::contract::{Plugin, PluginFactory};
use crate::error::RegistrationError;

/// One successfully registered plugin instance.
#[derive(Clone)]
pub struct PluginRecord {
    /// Unique id within the engine: `{counter}_{name}_{version}`.
    pub id: String,
    /// The factory that built this instance. Never invoked again for it.
    pub factory: PluginFactory,
    /// The live plugin.
    pub instance: Arc<dyn Plugin>,
    /// Whether dispatch reaches this plugin.
    pub active: bool,
}

impl std::fmt::Debug for PluginRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRecord")
            .field("id", &self.id)
            .field("factory", &self.factory)
            .field("active", &self.active)
            .finish()
    }
}

/// Registry of plugin records.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    records: Vec<PluginRecord>,
}

impl PluginRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. Fails if its id is already present.
    pub fn insert(&mut self, record: PluginRecord) -> Result<(), RegistrationError> {
        if self.contains(&record.id) {
            return Err(RegistrationError::IdCollision { id: record.id });
        }
        self.records.push(record);
        Ok(())
    }

    /// Removes a record by id.
    pub fn remove(&mut self, id: &str) -> Option<PluginRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }

    /// Removes every record, in registration order.
    pub fn drain(&mut self) -> Vec<PluginRecord> {
        std::mem::take(&mut self.records)
    }

    /// Gets a record by id.
    pub fn get(&self, id: &str) -> Option<&PluginRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Checks whether an id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Whether the plugin exists and is active.
    pub fn is_active(&self, id: &str) -> bool {
        self.get(id).is_some_and(|r| r.active)
    }

    /// Sets the active flag. Returns false if the id is unknown.
    pub fn set_active(&mut self, id: &str, active: bool) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.active = active;
                true
            }
            None => false,
        }
    }

    /// Ids in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    /// Active plugin instances in registration order.
    pub fn active_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.records
            .iter()
            .filter(|r| r.active)
            .map(|r| r.instance.clone())
            .collect()
    }

    /// All plugin instances in registration order.
    pub fn all_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.records.iter().map(|r| r.instance.clone()).collect()
    }

    /// Returns record count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
