//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use gang_admission::builders::GangPluginBuilder;
use gang_admission::config::AdmissionConfig;
use gang_admission::core::{GangPlugin, GroupRecord, Unit, UnitPhase, WaitingUnitHooks};
use gang_admission::infra::{InMemoryGroupStore, InMemoryInventory};
use parking_lot::Mutex;

/// Records every callback the plugin makes into the pipeline.
#[derive(Default)]
pub struct RecordingHooks {
    pub allowed: Mutex<Vec<Unit>>,
    pub timed_out: Mutex<Vec<(Unit, String)>>,
}

impl RecordingHooks {
    pub fn allowed_names(&self) -> Vec<String> {
        self.allowed.lock().iter().map(|u| u.key.name.clone()).collect()
    }

    pub fn timed_out_names(&self) -> Vec<String> {
        self.timed_out
            .lock()
            .iter()
            .map(|(u, _)| u.key.name.clone())
            .collect()
    }
}

impl WaitingUnitHooks for RecordingHooks {
    fn allow(&self, unit: &Unit, admitter: &str) {
        assert_eq!(unit.phase, UnitPhase::Admitted);
        assert_eq!(admitter, "coscheduling");
        self.allowed.lock().push(unit.clone());
    }

    fn time_out(&self, unit: &Unit, reason: &str) {
        assert_eq!(unit.phase, UnitPhase::TimedOut);
        self.timed_out.lock().push((unit.clone(), reason.to_string()));
    }
}

/// A plugin wired to in-memory collaborators the test can still mutate.
pub struct Fixture {
    pub plugin: GangPlugin,
    pub store: Arc<InMemoryGroupStore>,
    pub inventory: Arc<InMemoryInventory>,
    pub hooks: Arc<RecordingHooks>,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryGroupStore::new());
        let inventory = Arc::new(InMemoryInventory::new());
        let hooks = Arc::new(RecordingHooks::default());
        let plugin = GangPluginBuilder::new(AdmissionConfig::default())
            .with_store(store.clone())
            .with_inventory(inventory.clone())
            .with_hooks(hooks.clone())
            .build()
            .expect("fixture plugin");
        Self {
            plugin,
            store,
            inventory,
            hooks,
        }
    }

    /// Declare `namespace/group` with quorum `min_available`.
    pub fn group(&self, namespace: &str, group: &str, min_available: &str, created_ms: u128) {
        self.store.upsert(
            namespace,
            group,
            GroupRecord::new(created_ms).with_min_available(min_available),
        );
    }
}

pub fn member(namespace: &str, name: &str, group: &str) -> Unit {
    Unit::new(namespace, name, format!("uid-{namespace}-{name}")).in_group(group)
}
