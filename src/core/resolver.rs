//! Resolution of a group name to its parsed configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::core::collaborators::{MIN_AVAILABLE_FIELD, SCHEDULE_TIMEOUT_FIELD};
use crate::core::{AdmissionError, GroupConfigStore, GroupKey};

/// Timeout applied when a record carries no timeout field.
pub const DEFAULT_SCHEDULE_TIMEOUT: Duration = Duration::from_secs(10);

/// Parsed group configuration, valid for a single admission decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    /// Group identity.
    pub key: GroupKey,
    /// Quorum size; 0 when the record does not set one.
    pub min_available: u64,
    /// How long a suspended member may wait for quorum.
    pub schedule_timeout: Duration,
    /// Creation time in milliseconds since epoch.
    pub creation_time_ms: u128,
}

impl GroupConfig {
    /// Whether this quorum actually holds units back. A quorum of 0 or 1 is
    /// met by any unit on its own.
    pub const fn gates_admission(&self) -> bool {
        self.min_available > 1
    }
}

/// Resolves `(namespace, group)` to a [`GroupConfig`].
///
/// Stateless: every call re-reads the store, so updates to a record apply to
/// the next decision.
#[derive(Clone)]
pub struct GroupConfigResolver {
    store: Arc<dyn GroupConfigStore>,
    default_timeout: Duration,
}

impl GroupConfigResolver {
    /// Create a resolver over `store`.
    pub fn new(store: Arc<dyn GroupConfigStore>, default_timeout: Duration) -> Self {
        Self {
            store,
            default_timeout,
        }
    }

    /// Resolve the configuration of `group` in `namespace`.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::ConfigNotFound`] if no record exists.
    /// - [`AdmissionError::InvalidConfig`] if a numeric field does not parse
    ///   as a non-negative integer.
    /// - [`AdmissionError::Internal`] if the store read fails.
    pub fn resolve(&self, namespace: &str, group: &str) -> Result<GroupConfig, AdmissionError> {
        let record = self
            .store
            .get(namespace, group)
            .map_err(|e| {
                tracing::error!("reading group config {namespace}/{group} failed: {e:#}");
                AdmissionError::internal(&e)
            })?
            .ok_or_else(|| AdmissionError::ConfigNotFound {
                namespace: namespace.to_string(),
                group: group.to_string(),
            })?;

        let invalid = |field: &str, value: &str, err: std::num::ParseIntError| {
            AdmissionError::InvalidConfig {
                namespace: namespace.to_string(),
                group: group.to_string(),
                field: field.to_string(),
                value: value.to_string(),
                reason: format!("expected a non-negative integer ({err})"),
            }
        };

        let min_available = match record.data.get(MIN_AVAILABLE_FIELD) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| invalid(MIN_AVAILABLE_FIELD, raw, e))?,
            None => 0,
        };

        let schedule_timeout = match record.data.get(SCHEDULE_TIMEOUT_FIELD) {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|e| invalid(SCHEDULE_TIMEOUT_FIELD, raw, e))?,
            ),
            None => self.default_timeout,
        };

        Ok(GroupConfig {
            key: GroupKey::new(namespace, group),
            min_available,
            schedule_timeout,
            creation_time_ms: record.creation_time_ms,
        })
    }

    /// Creation time of `group`, or `None` if the record is missing or
    /// unreadable. Numeric fields are not validated here.
    pub fn creation_time(&self, namespace: &str, group: &str) -> Option<u128> {
        match self.store.get(namespace, group) {
            Ok(record) => record.map(|r| r.creation_time_ms),
            Err(e) => {
                tracing::debug!("no creation time for {namespace}/{group}: {e:#}");
                None
            }
        }
    }
}
