//! Quorum evaluation: the permit gate for grouped units.
//!
//! A grouped unit is admitted once `running + waiting + 1 >= minAvailable`.
//! The unit that crosses the threshold also releases every sibling waiting in
//! the [`SuspensionRegistry`]; no separate watcher is involved. Counts are
//! recomputed from the inventory view and the registry on every call.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::registry::{self, Suspension};
use crate::core::{
    AdmissionError, GroupConfigResolver, GroupKey, GroupSelector, InventoryView,
    SuspensionRegistry, Unit, UnitKey, UnitPhase, WaitingUnitHooks,
};
use crate::util::clock::{deadline_after, now_ms};

/// A unit refused admission, with the cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The refused unit.
    pub unit: UnitKey,
    /// Why.
    pub error: AdmissionError,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {} rejected: {}", self.unit, self.error)
    }
}

/// Outcome of a permit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed now.
    Admit,
    /// Wait for siblings; carries the quorum counts observed.
    Suspend(String),
    /// Refused; not retryable until the operator fixes the cause.
    Reject(Rejection),
}

impl Decision {
    /// Whether this is [`Decision::Admit`].
    pub const fn is_admit(&self) -> bool {
        matches!(self, Self::Admit)
    }

    /// Whether this is [`Decision::Suspend`].
    pub const fn is_suspend(&self) -> bool {
        matches!(self, Self::Suspend(_))
    }

    /// Human-readable reason, empty for `Admit`.
    pub fn reason(&self) -> String {
        match self {
            Self::Admit => String::new(),
            Self::Suspend(reason) => reason.clone(),
            Self::Reject(rejection) => rejection.to_string(),
        }
    }
}

enum QuorumOutcome {
    Short { running: usize, waiting: usize },
    Reached {
        running: usize,
        waiting: usize,
        released: Vec<Suspension>,
    },
}

/// Decides whether a unit may start now, must wait for its group, or is refused.
pub struct QuorumEvaluator {
    resolver: GroupConfigResolver,
    inventory: Arc<dyn InventoryView>,
    hooks: Arc<dyn WaitingUnitHooks>,
    registry: Arc<SuspensionRegistry>,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
    admitter: String,
    group_label: String,
}

impl QuorumEvaluator {
    /// Create an evaluator from its collaborators.
    ///
    /// `admitter` is passed to [`WaitingUnitHooks::allow`] on release;
    /// `group_label` is the label key carrying a unit's group name.
    pub fn new(
        resolver: GroupConfigResolver,
        inventory: Arc<dyn InventoryView>,
        hooks: Arc<dyn WaitingUnitHooks>,
        registry: Arc<SuspensionRegistry>,
        admitter: impl Into<String>,
        group_label: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            inventory,
            hooks,
            registry,
            audit: None,
            admitter: admitter.into(),
            group_label: group_label.into(),
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Registry of currently suspended units.
    pub const fn registry(&self) -> &Arc<SuspensionRegistry> {
        &self.registry
    }

    /// Label key carrying a unit's group name.
    pub fn group_label(&self) -> &str {
        &self.group_label
    }

    /// Decide whether `unit` may proceed.
    ///
    /// Returns the decision and how long a suspended unit may wait; the
    /// timeout is zero for `Admit` and `Reject`. Only `Queued` units and
    /// units already `Suspended` are considered; any other phase is rejected
    /// with [`AdmissionError::InvalidTransition`].
    pub fn permit(&self, unit: &Unit) -> (Decision, Duration) {
        let group = unit.group_key(&self.group_label);
        if unit.phase.is_terminal() {
            let error = AdmissionError::InvalidTransition {
                unit: unit.key.to_string(),
                from: unit.phase,
                to: UnitPhase::Admitted,
            };
            return self.reject(unit, group.as_ref(), error);
        }
        let Some(group) = group else {
            return (Decision::Admit, Duration::ZERO);
        };

        let config = match self.resolver.resolve(&group.namespace, &group.name) {
            Ok(config) => config,
            Err(error) => return self.reject(unit, Some(&group), error),
        };

        if !config.gates_admission() {
            tracing::debug!(
                "group {group} quorum {} needs no gating, admitting {}",
                config.min_available,
                unit.key.name
            );
            self.record(unit, Some(&group), AuditAction::Admit, None);
            return (Decision::Admit, Duration::ZERO);
        }

        let quorum = usize::try_from(config.min_available).unwrap_or(usize::MAX);
        let selector = GroupSelector::new(self.group_label.clone(), group.name.clone());
        let deadline_ms = deadline_after(now_ms(), config.schedule_timeout);

        let mut candidate = unit.clone();
        if candidate.phase == UnitPhase::Queued {
            if let Err(error) = candidate.transition(UnitPhase::Suspended) {
                return self.reject(unit, Some(&group), error);
            }
        }

        // Count, decide, and register/take under one bucket lock.
        let outcome = self.registry.with_bucket(&group, |bucket| -> Result<QuorumOutcome, AdmissionError> {
            let running = self
                .inventory
                .running_count(&group.namespace, &selector)
                .map_err(|e| {
                    tracing::error!("running count for {group} failed: {e:#}");
                    AdmissionError::internal(&e)
                })?;
            let waiting = bucket.count_excluding(&unit.key.uid);

            if running + waiting + 1 < quorum {
                // An already suspended uid keeps its slot with a fresh deadline.
                bucket.insert(candidate, deadline_ms)?;
                Ok(QuorumOutcome::Short { running, waiting })
            } else {
                bucket.take(&unit.key.uid);
                Ok(QuorumOutcome::Reached {
                    running,
                    waiting,
                    released: bucket.take_all(),
                })
            }
        });

        match outcome {
            Err(error) => {
                self.registry.prune(&group);
                self.reject(unit, Some(&group), error)
            }
            Ok(QuorumOutcome::Short { running, waiting }) => {
                let msg = format!(
                    "group {group} member {} ({}) is below minAvailable({}): running({running}), waiting({waiting})",
                    unit.key.name, unit.key.uid, config.min_available
                );
                tracing::debug!("{msg}");
                self.record(unit, Some(&group), AuditAction::Suspend, Some(msg.clone()));
                (Decision::Suspend(msg), config.schedule_timeout)
            }
            Ok(QuorumOutcome::Reached {
                running,
                waiting,
                released,
            }) => {
                tracing::info!(
                    "group {group} reached minAvailable({}) at {}: running({running}), waiting({waiting}), releasing {}",
                    config.min_available,
                    unit.key.name,
                    released.len()
                );
                self.release(&group, released);
                self.registry.prune(&group);
                self.record(unit, Some(&group), AuditAction::Admit, None);
                (Decision::Admit, Duration::ZERO)
            }
        }
    }

    /// Time out `unit` if it is still suspended. Returns `false` when a
    /// sibling already released it or it was never suspended.
    pub fn expire(&self, unit: &Unit) -> bool {
        let Some(group) = unit.group_key(&self.group_label) else {
            return false;
        };
        match self.registry.expire(&group, &unit.key.uid) {
            Some(expired) => {
                self.report_timeout(&group, &expired);
                true
            }
            None => false,
        }
    }

    /// Time out every suspension whose deadline is at or before `now_ms`.
    pub fn expire_due(&self, now_ms: u128) -> Vec<Unit> {
        let expired = self.registry.expire_due(now_ms);
        for unit in &expired {
            match unit.group_key(&self.group_label) {
                Some(group) => self.report_timeout(&group, unit),
                None => self.hooks.time_out(unit, "suspension expired"),
            }
        }
        if !expired.is_empty() {
            tracing::warn!("expired {} suspended units", expired.len());
        }
        expired
    }

    fn release(&self, group: &GroupKey, released: Vec<Suspension>) {
        for unit in released.into_iter().filter_map(registry::admit) {
            tracing::debug!("permit allows unit {group}/{}", unit.key.name);
            self.hooks.allow(&unit, &self.admitter);
            self.record(&unit, Some(group), AuditAction::Release, None);
        }
    }

    fn report_timeout(&self, group: &GroupKey, unit: &Unit) {
        let reason = format!(
            "group {group} did not reach quorum before unit {} ({}) timed out",
            unit.key.name, unit.key.uid
        );
        tracing::warn!("{reason}");
        self.hooks.time_out(unit, &reason);
        self.record(unit, Some(group), AuditAction::Expire, Some(reason));
    }

    fn reject(&self, unit: &Unit, group: Option<&GroupKey>, error: AdmissionError) -> (Decision, Duration) {
        let rejection = Rejection {
            unit: unit.key.clone(),
            error,
        };
        tracing::warn!("{rejection}");
        self.record(unit, group, AuditAction::Reject, Some(rejection.to_string()));
        (Decision::Reject(rejection), Duration::ZERO)
    }

    fn record(&self, unit: &Unit, group: Option<&GroupKey>, action: AuditAction, detail: Option<String>) {
        if let Some(audit) = &self.audit {
            audit
                .lock()
                .record(build_audit_event(unit, group, action, detail));
        }
    }
}
