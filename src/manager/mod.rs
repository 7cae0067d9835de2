// Modpack manager facade
//
// Single entry point for the presentation layer: wraps the collection store
// (which owns the change log), the storage backend, and a broadcast channel for
// change notifications.

use crate::models::Settings;
use crate::persistence::{self, FileStorage, LoadOutcome, PersistenceError, Storage};
use crate::store::ModCollectionStore;
use camino::Utf8Path;
use tokio::sync::broadcast;

/// Change events emitted when the collection is modified
///
/// Every facade mutator returns the events it produced (empty for a no-op) and
/// also broadcasts them to subscribers, so a UI can refresh without polling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionChange {
    /// A modpack was registered
    ModpackAdded { name: String },

    /// A modpack and its mod list were dropped
    ModpackRemoved { name: String },

    /// The registry was replaced wholesale
    ModpacksReplaced { count: usize },

    /// A modpack's mod list was replaced wholesale
    ModsReplaced { modpack: String, count: usize },

    /// A mod was added to a modpack
    ModAdded { modpack: String, name: String },

    /// A mod was removed from a modpack
    ModRemoved { modpack: String, name: String },

    /// The added/removed change log was reset
    ChangesCleared,

    /// The collection was written to storage
    Saved { location: String },

    /// Writing the collection failed; in-memory state is unchanged
    SaveFailed { location: String, message: String },

    /// The collection was replaced from storage
    Loaded { modpacks: usize },
}

impl CollectionChange {
    /// Whether this event changed persisted state (registry or mod map).
    pub fn is_collection_edit(&self) -> bool {
        matches!(
            self,
            Self::ModpackAdded { .. }
                | Self::ModpackRemoved { .. }
                | Self::ModpacksReplaced { .. }
                | Self::ModsReplaced { .. }
                | Self::ModAdded { .. }
                | Self::ModRemoved { .. }
        )
    }
}

/// Facade over the modpack collection, its change log, and its data file.
///
/// Not internally synchronized: callers issue one operation at a time and
/// never save or load while another mutation is in flight.
///
/// # Usage
///
/// ```no_run
/// use modpack_manager::ModpackManager;
///
/// let mut manager = ModpackManager::new("modpack_data.txt");
/// manager.load()?;
///
/// manager.add_modpack("Vanilla+");
/// manager.add_mod_to_modpack("Vanilla+", "JEI");
/// println!("{}", manager.summary());
///
/// manager.save()?;
/// # Ok::<(), modpack_manager::PersistenceError>(())
/// ```
pub struct ModpackManager {
    store: ModCollectionStore,
    storage: Box<dyn Storage>,
    auto_save: bool,

    /// Broadcast channel for emitting change events
    change_tx: broadcast::Sender<CollectionChange>,
}

impl ModpackManager {
    /// Create a manager backed by the file at `data_path`, with auto-save off.
    pub fn new<P: AsRef<Utf8Path>>(data_path: P) -> Self {
        Self::with_storage(Box::new(FileStorage::new(data_path)), false)
    }

    /// Create a manager from user settings, resolving the data file against `base_dir`.
    pub fn from_settings(settings: &Settings, base_dir: &Utf8Path) -> Self {
        let data_path = settings.data_path(base_dir);
        tracing::info!(
            "Modpack data file: {}, auto_save={}",
            data_path,
            settings.auto_save
        );
        Self::with_storage(Box::new(FileStorage::new(data_path)), settings.auto_save)
    }

    /// Create a manager over any storage backend.
    ///
    /// # Returns
    /// An empty manager with a broadcast channel buffer of 100 events
    pub fn with_storage(storage: Box<dyn Storage>, auto_save: bool) -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            store: ModCollectionStore::new(),
            storage,
            auto_save,
            change_tx,
        }
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionChange> {
        self.change_tx.subscribe()
    }

    pub fn store(&self) -> &ModCollectionStore {
        &self.store
    }

    pub fn location(&self) -> String {
        self.storage.location()
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.auto_save = enabled;
    }

    // Registry

    pub fn add_modpack(&mut self, name: &str) -> Vec<CollectionChange> {
        if !self.store.add_modpack(name) {
            return Vec::new();
        }
        tracing::debug!("Added modpack {}", name);
        self.commit(vec![CollectionChange::ModpackAdded {
            name: name.to_string(),
        }])
    }

    pub fn remove_modpack(&mut self, name: &str) -> Vec<CollectionChange> {
        if !self.store.remove_modpack(name) {
            return Vec::new();
        }
        tracing::debug!("Removed modpack {}", name);
        self.commit(vec![CollectionChange::ModpackRemoved {
            name: name.to_string(),
        }])
    }

    pub fn modpacks(&self) -> Vec<String> {
        self.store.modpacks()
    }

    pub fn modpack_mods(&self, modpack: &str) -> Vec<String> {
        self.store.modpack_mods(modpack)
    }

    /// Replace the registry. Existing mod lists are kept as they are.
    pub fn set_modpacks(&mut self, names: Vec<String>) -> Vec<CollectionChange> {
        let count = names.len();
        self.store.set_modpacks(names);
        self.commit(vec![CollectionChange::ModpacksReplaced { count }])
    }

    /// Replace a mod list without touching the change log.
    pub fn set_modpack_mods(&mut self, modpack: &str, mods: Vec<String>) -> Vec<CollectionChange> {
        let count = mods.len();
        self.store.set_modpack_mods(modpack, mods);
        self.commit(vec![CollectionChange::ModsReplaced {
            modpack: modpack.to_string(),
            count,
        }])
    }

    // Mods

    pub fn add_mod_to_modpack(&mut self, modpack: &str, name: &str) -> Vec<CollectionChange> {
        if !self.store.add_mod_to_modpack(modpack, name) {
            return Vec::new();
        }
        tracing::debug!("Added mod {} to {}", name, modpack);
        self.commit(vec![CollectionChange::ModAdded {
            modpack: modpack.to_string(),
            name: name.to_string(),
        }])
    }

    pub fn remove_mod_from_modpack(&mut self, modpack: &str, name: &str) -> Vec<CollectionChange> {
        if !self.store.remove_mod_from_modpack(modpack, name) {
            return Vec::new();
        }
        tracing::debug!("Removed mod {} from {}", name, modpack);
        self.commit(vec![CollectionChange::ModRemoved {
            modpack: modpack.to_string(),
            name: name.to_string(),
        }])
    }

    pub fn summary(&self) -> String {
        self.store.summary()
    }

    // Change log

    pub fn added_mods(&self) -> Vec<String> {
        self.store.tracker().added()
    }

    pub fn removed_mods(&self) -> Vec<String> {
        self.store.tracker().removed()
    }

    pub fn has_changes(&self) -> bool {
        self.store.tracker().has_changes()
    }

    pub fn clear_changes(&mut self) -> Vec<CollectionChange> {
        if !self.has_changes() {
            return Vec::new();
        }
        self.store.tracker_mut().clear();
        self.commit(vec![CollectionChange::ChangesCleared])
    }

    /// Render the change log for display.
    pub fn changes_report(&self) -> String {
        self.store.tracker().report()
    }

    /// Render the change log and then clear it.
    pub fn take_changes_report(&mut self) -> String {
        let report = self.changes_report();
        self.clear_changes();
        report
    }

    // Persistence

    /// Write the collection to storage.
    ///
    /// Failures are logged, broadcast as [`CollectionChange::SaveFailed`], and
    /// returned; in-memory state is never touched.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let (result, event) = self.persist();
        self.broadcast(&[event]);
        result
    }

    /// Replace the collection with the contents of storage.
    ///
    /// The collection is cleared first. A missing data file leaves it empty and
    /// returns [`LoadOutcome::Missing`]. If reading fails part way the lines
    /// parsed so far stay applied and the error is returned. The change log is
    /// kept.
    pub fn load(&mut self) -> Result<LoadOutcome, PersistenceError> {
        let result = persistence::load(self.storage.as_ref(), &mut self.store);

        match &result {
            Ok(_) => {
                let modpacks = self.store.modpacks().len();
                self.broadcast(&[CollectionChange::Loaded { modpacks }]);
            }
            Err(e) => {
                tracing::error!(
                    "Error loading data: {} ({} modpacks kept from partial read)",
                    e,
                    self.store.modpacks().len()
                );
            }
        }

        result
    }

    fn persist(&self) -> (Result<(), PersistenceError>, CollectionChange) {
        let location = self.storage.location();
        match persistence::save(self.storage.as_ref(), &self.store) {
            Ok(()) => (Ok(()), CollectionChange::Saved { location }),
            Err(e) => {
                tracing::error!("Error saving data: {}", e);
                let message = e.to_string();
                (Err(e), CollectionChange::SaveFailed { location, message })
            }
        }
    }

    /// Auto-save if needed, then broadcast and return the events.
    fn commit(&mut self, mut changes: Vec<CollectionChange>) -> Vec<CollectionChange> {
        if self.auto_save && changes.iter().any(CollectionChange::is_collection_edit) {
            let (_, event) = self.persist();
            changes.push(event);
        }

        self.broadcast(&changes);
        changes
    }

    fn broadcast(&self, changes: &[CollectionChange]) {
        for change in changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.change_tx.send(change.clone());
        }
    }
}
