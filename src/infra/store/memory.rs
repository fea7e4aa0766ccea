//! In-memory group config store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::{AppResult, GroupConfigStore, GroupKey, GroupRecord};

/// Group records held in a map, for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    records: RwLock<HashMap<GroupKey, GroupRecord>>,
}

impl InMemoryGroupStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record of `namespace/name`.
    pub fn upsert(&self, namespace: &str, name: &str, record: GroupRecord) {
        self.records
            .write()
            .insert(GroupKey::new(namespace, name), record);
    }

    /// Remove the record of `namespace/name`, returning it.
    pub fn remove(&self, namespace: &str, name: &str) -> Option<GroupRecord> {
        self.records.write().remove(&GroupKey::new(namespace, name))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl GroupConfigStore for InMemoryGroupStore {
    fn get(&self, namespace: &str, name: &str) -> AppResult<Option<GroupRecord>> {
        Ok(self
            .records
            .read()
            .get(&GroupKey::new(namespace, name))
            .cloned())
    }
}
