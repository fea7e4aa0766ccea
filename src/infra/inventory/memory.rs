//! In-memory inventory view.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::core::{AppResult, GroupSelector, InventoryView};

/// Observed run state of an inventory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Accepted but not started.
    Pending,
    /// Running on a node.
    Running,
    /// Finished, successfully or not.
    Finished,
}

/// A unit as seen by the inventory.
#[derive(Debug, Clone)]
pub struct InventoryEntry {
    /// Namespace.
    pub namespace: String,
    /// Name.
    pub name: String,
    /// Labels used for selection.
    pub labels: BTreeMap<String, String>,
    /// Run state.
    pub state: RunState,
}

/// Inventory kept in memory; reads take a shared lock.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    entries: RwLock<Vec<InventoryEntry>>,
}

impl InMemoryInventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a unit labelled `label=group` in `namespace` with `state`,
    /// replacing any entry with the same namespace and name.
    pub fn upsert(&self, namespace: &str, name: &str, label: &str, group: &str, state: RunState) {
        let entry = InventoryEntry {
            namespace: namespace.to_string(),
            name: name.to_string(),
            labels: BTreeMap::from([(label.to_string(), group.to_string())]),
            state,
        };
        let mut entries = self.entries.write();
        entries.retain(|e| !(e.namespace == namespace && e.name == name));
        entries.push(entry);
    }

    /// Update the state of `namespace/name`. Returns `false` if unknown.
    pub fn set_state(&self, namespace: &str, name: &str, state: RunState) -> bool {
        let mut entries = self.entries.write();
        match entries
            .iter_mut()
            .find(|e| e.namespace == namespace && e.name == name)
        {
            Some(entry) => {
                entry.state = state;
                true
            }
            None => false,
        }
    }

    /// Number of entries, in any state.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl InventoryView for InMemoryInventory {
    fn running_count(&self, namespace: &str, selector: &GroupSelector) -> AppResult<usize> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|e| {
                e.namespace == namespace
                    && e.state == RunState::Running
                    && selector.matches(&e.labels)
            })
            .count())
    }
}
