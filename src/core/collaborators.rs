//! Traits for the external collaborators the admission core reads from and
//! signals to: the group config store, the inventory view, and the placement
//! pipeline's waiting-unit hooks.
//!
//! All reads are synchronous and expected to hit a local cache. Implementations
//! must be safe to call from many threads at once.

use std::collections::HashMap;

use crate::core::{AppResult, GroupSelector, Unit};

/// Record field holding the quorum size.
pub const MIN_AVAILABLE_FIELD: &str = "minAvailable";
/// Record field holding the schedule timeout in seconds.
pub const SCHEDULE_TIMEOUT_FIELD: &str = "scheduleTimeoutSeconds";

/// Raw group configuration as stored externally.
///
/// Field values are strings; [`crate::core::GroupConfigResolver`] parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRecord {
    /// String-typed configuration fields.
    pub data: HashMap<String, String>,
    /// Group creation time in milliseconds since epoch, used for ordering.
    pub creation_time_ms: u128,
}

impl GroupRecord {
    /// Create an empty record created at `creation_time_ms`.
    pub fn new(creation_time_ms: u128) -> Self {
        Self {
            data: HashMap::new(),
            creation_time_ms,
        }
    }

    /// Set a raw field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set the quorum field.
    #[must_use]
    pub fn with_min_available(self, value: impl Into<String>) -> Self {
        self.with_field(MIN_AVAILABLE_FIELD, value)
    }

    /// Set the timeout field.
    #[must_use]
    pub fn with_schedule_timeout_secs(self, value: impl Into<String>) -> Self {
        self.with_field(SCHEDULE_TIMEOUT_FIELD, value)
    }
}

/// Read-mostly store of group configuration records.
pub trait GroupConfigStore: Send + Sync {
    /// Fetch the record for `(namespace, name)`; `Ok(None)` when absent.
    fn get(&self, namespace: &str, name: &str) -> AppResult<Option<GroupRecord>>;
}

/// Eventually consistent view of units already running.
pub trait InventoryView: Send + Sync {
    /// Count units in `namespace` matching `selector` that are running.
    fn running_count(&self, namespace: &str, selector: &GroupSelector) -> AppResult<usize>;
}

/// Hooks into the placement pipeline's waiting-unit registry.
pub trait WaitingUnitHooks: Send + Sync {
    /// Let a previously suspended unit proceed. `admitter` names the plugin
    /// that completed the quorum.
    fn allow(&self, unit: &Unit, admitter: &str);

    /// Report that a suspended unit's wait budget ran out. The pipeline
    /// decides whether to requeue it.
    fn time_out(&self, unit: &Unit, reason: &str);
}
