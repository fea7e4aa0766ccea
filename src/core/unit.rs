//! Units of work, their identities, and the phase lifecycle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::AdmissionError;

/// Label key a unit uses to declare its group, unless configured otherwise.
pub const DEFAULT_GROUP_LABEL: &str = "pod-group.scheduling.bdap.com/name";

/// Identity of a group: groups are scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    /// Namespace owning the group.
    pub namespace: String,
    /// Group name, the value of the group label.
    pub name: String,
}

impl GroupKey {
    /// Create a group key.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Identity of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitKey {
    /// Namespace of the unit.
    pub namespace: String,
    /// Unit name.
    pub name: String,
    /// Unique identifier, stable across retries of the same unit.
    pub uid: String,
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.namespace, self.name, self.uid)
    }
}

/// Admission phase of a unit.
///
/// Allowed moves: `Queued -> {Suspended, Admitted, Rejected}` and
/// `Suspended -> {Admitted, TimedOut}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPhase {
    /// Waiting in the admission queue.
    Queued,
    /// Held until its group reaches quorum.
    Suspended,
    /// Allowed to proceed.
    Admitted,
    /// Refused because of a configuration or internal error.
    Rejected,
    /// Suspension outlived the group's schedule timeout.
    TimedOut,
}

impl UnitPhase {
    /// Whether the lifecycle permits moving from `self` to `next`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Suspended | Self::Admitted | Self::Rejected)
                | (Self::Suspended, Self::Admitted | Self::TimedOut)
        )
    }

    /// Whether no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Admitted | Self::Rejected | Self::TimedOut)
    }
}

/// A unit of work asking for admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Identity.
    pub key: UnitKey,
    /// Labels, one of which may carry the group name.
    pub labels: BTreeMap<String, String>,
    /// Higher is more urgent.
    pub priority: i32,
    /// When the unit was first enqueued, in milliseconds since epoch.
    pub arrival_ms: u128,
    /// Current phase.
    pub phase: UnitPhase,
}

impl Unit {
    /// Create a queued unit with no labels, priority 0 and arrival 0.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        Self {
            key: UnitKey {
                namespace: namespace.into(),
                name: name.into(),
                uid: uid.into(),
            },
            labels: BTreeMap::new(),
            priority: 0,
            arrival_ms: 0,
            phase: UnitPhase::Queued,
        }
    }

    /// Add a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Declare group membership under [`DEFAULT_GROUP_LABEL`].
    #[must_use]
    pub fn in_group(self, group: impl Into<String>) -> Self {
        self.with_label(DEFAULT_GROUP_LABEL, group)
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the arrival timestamp.
    #[must_use]
    pub const fn with_arrival_ms(mut self, arrival_ms: u128) -> Self {
        self.arrival_ms = arrival_ms;
        self
    }

    /// Namespace shortcut.
    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    /// Group name declared under `label`, ignoring empty values.
    pub fn group_name(&self, label: &str) -> Option<&str> {
        self.labels
            .get(label)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Group key declared under `label`, scoped to the unit's namespace.
    pub fn group_key(&self, label: &str) -> Option<GroupKey> {
        self.group_name(label)
            .map(|name| GroupKey::new(self.key.namespace.clone(), name))
    }

    /// Move to `next`, enforcing the phase lifecycle.
    pub fn transition(&mut self, next: UnitPhase) -> Result<(), AdmissionError> {
        if !self.phase.can_transition_to(next) {
            return Err(AdmissionError::InvalidTransition {
                unit: self.key.to_string(),
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}

/// Equality selector on the group label, used to query the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSelector {
    /// Label key.
    pub label: String,
    /// Required label value.
    pub value: String,
}

impl GroupSelector {
    /// Selector matching members of `group` under `label`.
    pub fn new(label: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: group.into(),
        }
    }

    /// Whether `labels` satisfies the selector.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        labels.get(&self.label) == Some(&self.value)
    }
}
