// Change tracking module
//
// Keeps a running log of mods recently added to or removed from any modpack.
// The log is shown to the user and then cleared; it is never persisted.

use crate::models::is_blank;

/// Log of recently added and removed mods.
///
/// Recording a name in one list cancels only the *first* matching entry in the
/// other list. Repeating the same action appends the name again, so a list may
/// hold duplicates:
///
/// ```
/// use modpack_manager::ChangeTracker;
///
/// let mut tracker = ChangeTracker::new();
/// tracker.add_change("JEI");
/// tracker.add_change("JEI");
/// tracker.remove_change("JEI");
///
/// assert_eq!(tracker.added(), vec!["JEI"]);
/// assert_eq!(tracker.removed(), vec!["JEI"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    added: Vec<String>,
    removed: Vec<String>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` was added. Blank names are ignored.
    pub fn add_change(&mut self, name: &str) {
        if is_blank(name) {
            return;
        }
        self.added.push(name.to_string());
        remove_first(&mut self.removed, name);
    }

    /// Record that `name` was removed. Blank names are ignored.
    pub fn remove_change(&mut self, name: &str) {
        if is_blank(name) {
            return;
        }
        self.removed.push(name.to_string());
        remove_first(&mut self.added, name);
    }

    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Copy of the added log, oldest first.
    pub fn added(&self) -> Vec<String> {
        self.added.clone()
    }

    /// Copy of the removed log, oldest first.
    pub fn removed(&self) -> Vec<String> {
        self.removed.clone()
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    /// Render the log for display.
    ///
    /// Returns "No changes recorded." for an empty log; otherwise an
    /// "Added Mods:" block (`+ name` lines) followed by a "Removed Mods:"
    /// block (`- name` lines), separated by a blank line when both are present.
    pub fn report(&self) -> String {
        if !self.has_changes() {
            return "No changes recorded.".to_string();
        }

        let mut report = String::new();

        if !self.added.is_empty() {
            report.push_str("Added Mods:\n");
            for name in &self.added {
                report.push_str(&format!("+ {}\n", name));
            }
        }

        if !self.removed.is_empty() {
            if !self.added.is_empty() {
                report.push('\n');
            }
            report.push_str("Removed Mods:\n");
            for name in &self.removed {
                report.push_str(&format!("- {}\n", name));
            }
        }

        report
    }
}

fn remove_first(list: &mut Vec<String>, name: &str) {
    if let Some(index) = list.iter().position(|entry| entry == name) {
        list.remove(index);
    }
}
