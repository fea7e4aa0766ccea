//! Tests for builder modules

use std::sync::Arc;

use gang_admission::builders::GangPluginBuilder;
use gang_admission::config::AdmissionConfig;
use gang_admission::core::{
    AdmissionError, Decision, GroupRecord, SuspensionRegistry, Unit, WaitingUnitHooks,
};
use gang_admission::infra::{InMemoryGroupStore, InMemoryInventory};

struct NoopHooks;

impl WaitingUnitHooks for NoopHooks {
    fn allow(&self, _unit: &Unit, _admitter: &str) {}
    fn time_out(&self, _unit: &Unit, _reason: &str) {}
}

fn complete(config: AdmissionConfig) -> GangPluginBuilder {
    GangPluginBuilder::new(config)
        .with_store(Arc::new(InMemoryGroupStore::new()))
        .with_inventory(Arc::new(InMemoryInventory::new()))
        .with_hooks(Arc::new(NoopHooks))
}

#[test]
fn test_plugin_builder_defaults() {
    let builder = complete(AdmissionConfig::default());
    assert_eq!(builder.config().plugin_name, "coscheduling");

    let plugin = builder.build().unwrap();
    assert_eq!(plugin.name(), "coscheduling");
    assert!(plugin.evaluator().registry().is_empty());
}

#[test]
fn test_plugin_builder_requires_collaborators() {
    let no_store = GangPluginBuilder::new(AdmissionConfig::default())
        .with_inventory(Arc::new(InMemoryInventory::new()))
        .with_hooks(Arc::new(NoopHooks))
        .build();
    assert_eq!(
        no_store.err(),
        Some(AdmissionError::MissingCollaborator("group config store"))
    );

    let no_inventory = GangPluginBuilder::new(AdmissionConfig::default())
        .with_store(Arc::new(InMemoryGroupStore::new()))
        .with_hooks(Arc::new(NoopHooks))
        .build();
    assert_eq!(
        no_inventory.err(),
        Some(AdmissionError::MissingCollaborator("inventory view"))
    );

    let no_hooks = GangPluginBuilder::new(AdmissionConfig::default())
        .with_store(Arc::new(InMemoryGroupStore::new()))
        .with_inventory(Arc::new(InMemoryInventory::new()))
        .build();
    assert_eq!(
        no_hooks.err(),
        Some(AdmissionError::MissingCollaborator("waiting unit hooks"))
    );
}

#[test]
fn test_plugin_builder_rejects_invalid_config() {
    let config = AdmissionConfig {
        plugin_name: String::new(),
        ..AdmissionConfig::default()
    };
    assert!(matches!(
        complete(config).build().err(),
        Some(AdmissionError::PluginConfig(_))
    ));
}

#[test]
fn test_plugin_builder_shares_registry_and_label() {
    let registry = Arc::new(SuspensionRegistry::new());
    let store = Arc::new(InMemoryGroupStore::new());
    store.upsert("ns", "pg1", GroupRecord::new(1).with_min_available("2"));

    let config = AdmissionConfig {
        group_label: "gang".to_string(),
        ..AdmissionConfig::default()
    };
    let plugin = GangPluginBuilder::new(config)
        .with_store(store)
        .with_inventory(Arc::new(InMemoryInventory::new()))
        .with_hooks(Arc::new(NoopHooks))
        .with_registry(Arc::clone(&registry))
        .build()
        .unwrap();

    let labelled = Unit::new("ns", "a", "uid-a").with_label("gang", "pg1");
    assert!(plugin.permit(&labelled).0.is_suspend());
    assert_eq!(registry.len(), 1);

    // The default label key is not consulted once another one is configured.
    let default_labelled = Unit::new("ns", "b", "uid-b").in_group("pg1");
    assert_eq!(plugin.permit(&default_labelled).0, Decision::Admit);
    assert_eq!(registry.len(), 1);
}
