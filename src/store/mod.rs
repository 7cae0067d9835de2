// Modpack collection store
//
// Owns the modpack registry (ordered, unique names) and the mapping from
// modpack name to its mod list. Adding or removing a mod is recorded in the
// embedded ChangeTracker.

use crate::models::is_blank;
use crate::tracking::ChangeTracker;
use indexmap::IndexMap;

/// In-memory registry of modpacks and their mods.
///
/// All mutators treat invalid input (blank names, unknown modpacks, mods that
/// are not present) as a silent no-op and return `false`. A `true` return means
/// the collection changed.
///
/// # Known inconsistency
///
/// [`set_modpacks`](Self::set_modpacks) replaces the registry without touching
/// the mod map: dropped modpacks keep their mod lists until
/// [`remove_modpack`](Self::remove_modpack) is called for them, and new names
/// have no list until a mod is added. [`summary`](Self::summary) reports such names as
/// having 0 mods.
#[derive(Debug, Clone, Default)]
pub struct ModCollectionStore {
    modpacks: Vec<String>,
    modpack_mods: IndexMap<String, Vec<String>>,
    tracker: ChangeTracker,
}

impl ModCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new modpack with an empty mod list.
    ///
    /// Blank names and names already in the registry are rejected.
    pub fn add_modpack(&mut self, name: &str) -> bool {
        if is_blank(name) || self.contains_modpack(name) {
            tracing::debug!("Ignoring add of modpack {:?}", name);
            return false;
        }

        self.modpacks.push(name.to_string());
        self.modpack_mods.insert(name.to_string(), Vec::new());
        true
    }

    /// Drop a modpack and its mod list. Not recorded as mod removals.
    ///
    /// The mod list is discarded even when the name is no longer registered,
    /// which clears lists left behind by [`set_modpacks`](Self::set_modpacks).
    pub fn remove_modpack(&mut self, name: &str) -> bool {
        if is_blank(name) {
            return false;
        }

        let registered = match self.modpacks.iter().position(|m| m == name) {
            Some(index) => {
                self.modpacks.remove(index);
                true
            }
            None => false,
        };
        let had_mods = self.modpack_mods.shift_remove(name).is_some();
        registered || had_mods
    }

    /// Replace the whole registry, in order. Duplicates are kept as given and
    /// the mod map is left as is.
    pub fn set_modpacks(&mut self, names: Vec<String>) {
        self.modpacks = names;
    }

    /// Replace (or create) the mod list for `modpack` without recording changes.
    pub fn set_modpack_mods(&mut self, modpack: &str, mods: Vec<String>) {
        self.modpack_mods.insert(modpack.to_string(), mods);
    }

    pub fn modpacks(&self) -> Vec<String> {
        self.modpacks.clone()
    }

    /// Copy of the mod list for `modpack`; empty if the modpack has none.
    pub fn modpack_mods(&self, modpack: &str) -> Vec<String> {
        self.modpack_mods.get(modpack).cloned().unwrap_or_default()
    }

    pub fn contains_modpack(&self, name: &str) -> bool {
        self.modpacks.iter().any(|m| m == name)
    }

    /// Append `name` to the mod list of `modpack`, creating the list if needed.
    ///
    /// A mod already in the list is left alone and not recorded again.
    pub fn add_mod_to_modpack(&mut self, modpack: &str, name: &str) -> bool {
        if is_blank(name) {
            return false;
        }

        let mods = self.modpack_mods.entry(modpack.to_string()).or_default();
        if mods.iter().any(|m| m == name) {
            tracing::debug!("Mod {:?} already in modpack {:?}", name, modpack);
            return false;
        }

        mods.push(name.to_string());
        self.tracker.add_change(name);
        true
    }

    /// Remove the first occurrence of `name` from the mod list of `modpack`.
    pub fn remove_mod_from_modpack(&mut self, modpack: &str, name: &str) -> bool {
        let Some(mods) = self.modpack_mods.get_mut(modpack) else {
            return false;
        };
        let Some(index) = mods.iter().position(|m| m == name) else {
            return false;
        };

        mods.remove(index);
        self.tracker.remove_change(name);
        true
    }

    /// Multi-line report of every registered modpack and its mod count.
    ///
    /// ```
    /// use modpack_manager::ModCollectionStore;
    ///
    /// let mut store = ModCollectionStore::new();
    /// store.add_modpack("Vanilla+");
    /// store.add_mod_to_modpack("Vanilla+", "JEI");
    ///
    /// assert_eq!(
    ///     store.summary(),
    ///     "Modpack Summary:\nTotal modpacks: 1\n- Vanilla+: 1 mods\n"
    /// );
    /// ```
    pub fn summary(&self) -> String {
        let mut summary = String::from("Modpack Summary:\n");
        summary.push_str(&format!("Total modpacks: {}\n", self.modpacks.len()));

        for modpack in &self.modpacks {
            let count = self.modpack_mods.get(modpack).map_or(0, Vec::len);
            summary.push_str(&format!("- {}: {} mods\n", modpack, count));
        }

        summary
    }

    /// Iterate the mod map in insertion order.
    pub fn mod_lists(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.modpack_mods
            .iter()
            .map(|(name, mods)| (name.as_str(), mods.as_slice()))
    }

    /// Empty the registry and mod map. The change log is left untouched.
    pub fn clear_collection(&mut self) {
        self.modpacks.clear();
        self.modpack_mods.clear();
    }

    pub(crate) fn push_modpack(&mut self, name: String) {
        self.modpacks.push(name);
    }

    pub(crate) fn start_mod_list(&mut self, modpack: &str) {
        self.modpack_mods.insert(modpack.to_string(), Vec::new());
    }

    pub(crate) fn push_mod(&mut self, modpack: &str, name: String) {
        self.modpack_mods
            .entry(modpack.to_string())
            .or_default()
            .push(name);
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ChangeTracker {
        &mut self.tracker
    }
}

impl PartialEq for ModCollectionStore {
    /// Stores are equal when registry and mod lists match; mod map order and
    /// the change log are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.modpacks == other.modpacks
            && self.modpack_mods.len() == other.modpack_mods.len()
            && self
                .modpack_mods
                .iter()
                .all(|(name, mods)| other.modpack_mods.get(name) == Some(mods))
    }
}
