use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value;

use crate::host::WorldHandle;
use crate::location::LocationRecord;
use crate::storage::{Compound, DataStorage, StorageError};

pub const MOD_ID: &str = "tpmod";
pub const SAVED_DATA_SUFFIX: &str = "_locations";
pub const KEY_LOCATIONS: &str = "locations";

/// Key of the waypoint data inside a world's data container.
pub fn data_key() -> String {
    format!("{MOD_ID}{SAVED_DATA_SUFFIX}")
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Cannot get locations on client side!")]
    WrongExecutionContext,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// All global waypoints of one world, by name.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    entries: IndexMap<String, LocationRecord>,
    dirty: bool,
}

// Registries are equal when they hold the same waypoints, whether or not they were saved.
impl PartialEq for LocationRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for LocationRegistry {}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a persisted container.
    ///
    /// Entries which can't be parsed are skipped, the remaining ones are still loaded.
    pub fn load(container: &Compound) -> Self {
        let mut registry = Self::new();

        let Some(locations) = container.get(KEY_LOCATIONS) else {
            return registry;
        };
        let Value::Object(locations) = locations else {
            log::warn!("Ignoring `{KEY_LOCATIONS}` as it isn't an object: {locations}");
            return registry;
        };

        for (name, value) in locations {
            match LocationRecord::from_persisted(value) {
                Ok(record) => {
                    registry.entries.insert(name.clone(), record);
                }
                Err(e) => log::warn!("Skipping global location `{name}`: {e}"),
            }
        }

        registry
    }

    /// Write every entry under the `locations` key, replacing whatever was there before.
    pub fn save(&self, mut container: Compound) -> Compound {
        let locations = self
            .entries
            .iter()
            .map(|(name, record)| (name.clone(), record.to_persisted()))
            .collect();

        container.insert(KEY_LOCATIONS.to_string(), Value::Object(locations));
        container
    }

    pub fn add(&mut self, name: impl Into<String>, location: LocationRecord) {
        self.entries.insert(name.into(), location);
        self.set_dirty();
    }

    pub fn get(&self, name: &str) -> Option<&LocationRecord> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        // `shift_remove` keeps the remaining entries in insertion order.
        if self.entries.shift_remove(name).is_some() {
            self.set_dirty();
            true
        } else {
            false
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LocationRecord)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

struct Container {
    storage: DataStorage,
    registry: LocationRegistry,
}

impl Container {
    fn open(storage: DataStorage) -> Result<Self, RegistryError> {
        let registry = match storage.read(&data_key())? {
            Some(compound) => {
                let registry = LocationRegistry::load(&compound);
                log::info!(
                    "Loaded {} global location(s) from {}",
                    registry.len(),
                    storage.file_for(&data_key()).display()
                );
                registry
            }
            None => LocationRegistry::new(),
        };

        Ok(Self { storage, registry })
    }

    fn flush(&mut self) -> Result<(), RegistryError> {
        if !self.registry.is_dirty() {
            return Ok(());
        }

        let key = data_key();
        // Keep anything else stored alongside the locations.
        let existing = self.storage.read(&key).unwrap_or_else(|e| {
            log::warn!("Overwriting unreadable saved data: {e}");
            None
        });
        let compound = self.registry.save(existing.unwrap_or_default());
        self.storage.write(&key, &compound)?;
        self.registry.mark_saved();

        log::debug!("Saved global locations to {}", self.storage.file_for(&key).display());

        Ok(())
    }
}

/// Owns the one [LocationRegistry] of every top-level world, opened lazily from `<saves_directory>/<world>`.
pub struct RegistryStore {
    saves_directory: PathBuf,
    containers: HashMap<String, Container>,
}

impl RegistryStore {
    pub fn new(saves_directory: impl Into<PathBuf>) -> Self {
        Self {
            saves_directory: saves_directory.into(),
            containers: HashMap::new(),
        }
    }

    /// Get the registry of the given world, loading or creating it on first access.
    ///
    /// # Errors
    ///
    /// If called for a non-authoritative world, or if the persisted data couldn't be read.
    pub fn get_for(&mut self, world: &WorldHandle) -> Result<&mut LocationRegistry, RegistryError> {
        if !world.is_authoritative() {
            return Err(RegistryError::WrongExecutionContext);
        }

        let container = match self.containers.entry(world.name.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let storage = DataStorage::new(self.saves_directory.join(&world.name));
                entry.insert(Container::open(storage)?)
            }
        };

        Ok(&mut container.registry)
    }

    /// Flush the registry of `world` to disk if it has unsaved changes.
    pub fn save(&mut self, world: &str) -> Result<(), RegistryError> {
        match self.containers.get_mut(world) {
            Some(container) => container.flush(),
            None => Ok(()),
        }
    }

    pub fn save_all(&mut self) -> Result<(), RegistryError> {
        for container in self.containers.values_mut() {
            container.flush()?;
        }

        Ok(())
    }

    /// Flush and forget the registry of `world`, the next access reloads it from disk.
    pub fn unload(&mut self, world: &str) -> Result<(), RegistryError> {
        self.save(world)?;
        self.containers.remove(world);
        Ok(())
    }

    pub fn is_loaded(&self, world: &str) -> bool {
        self.containers.contains_key(world)
    }
}
