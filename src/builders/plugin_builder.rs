//! Builder wiring configuration and collaborators into a [`GangPlugin`].

use std::sync::Arc;

use crate::config::AdmissionConfig;
use crate::core::{
    AdmissionError, AuditSink, GangPlugin, GroupConfigResolver, GroupConfigStore, InventoryView,
    QueueOrderer, QuorumEvaluator, SuspensionRegistry, WaitingUnitHooks,
};

/// Assembles a [`GangPlugin`], refusing to build without every collaborator.
pub struct GangPluginBuilder {
    config: AdmissionConfig,
    store: Option<Arc<dyn GroupConfigStore>>,
    inventory: Option<Arc<dyn InventoryView>>,
    hooks: Option<Arc<dyn WaitingUnitHooks>>,
    registry: Option<Arc<SuspensionRegistry>>,
    audit: Option<Box<dyn AuditSink>>,
}

impl GangPluginBuilder {
    /// Start from `config`.
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config,
            store: None,
            inventory: None,
            hooks: None,
            registry: None,
            audit: None,
        }
    }

    /// Group configuration store (required).
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn GroupConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Inventory view of running units (required).
    #[must_use]
    pub fn with_inventory(mut self, inventory: Arc<dyn InventoryView>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Placement pipeline hooks for release and timeout (required).
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn WaitingUnitHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Share an existing suspension registry. A fresh one is created otherwise.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<SuspensionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Record decisions to `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// The configuration being built from.
    pub const fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::PluginConfig`] if the configuration is invalid.
    /// - [`AdmissionError::MissingCollaborator`] naming the first absent one.
    pub fn build(self) -> Result<GangPlugin, AdmissionError> {
        self.config.validate().map_err(AdmissionError::PluginConfig)?;

        let store = self
            .store
            .ok_or(AdmissionError::MissingCollaborator("group config store"))?;
        let inventory = self
            .inventory
            .ok_or(AdmissionError::MissingCollaborator("inventory view"))?;
        let hooks = self
            .hooks
            .ok_or(AdmissionError::MissingCollaborator("waiting unit hooks"))?;
        let registry = self.registry.unwrap_or_default();

        let resolver = GroupConfigResolver::new(store, self.config.default_schedule_timeout());
        let mut evaluator = QuorumEvaluator::new(
            resolver.clone(),
            inventory,
            hooks,
            registry,
            self.config.plugin_name.clone(),
            self.config.group_label.clone(),
        );
        if let Some(audit) = self.audit {
            evaluator = evaluator.with_audit(audit);
        }
        let orderer = QueueOrderer::new(resolver, self.config.group_label.clone());

        tracing::info!(
            "built gang plugin {} (label {}, default timeout {}s)",
            self.config.plugin_name,
            self.config.group_label,
            self.config.default_schedule_timeout_secs
        );
        Ok(GangPlugin::new(self.config.plugin_name, evaluator, orderer))
    }
}
