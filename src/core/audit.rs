//! Audit trail of admission decisions.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{GroupKey, Unit};
use crate::util::clock::now_ms;

/// What happened to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Held waiting for quorum.
    Suspend,
    /// Admitted by its own permit call.
    Admit,
    /// Admitted because a sibling completed the quorum.
    Release,
    /// Refused.
    Reject,
    /// Waited past the group's schedule timeout.
    Expire,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Suspend => "suspend",
            Self::Admit => "admit",
            Self::Release => "release",
            Self::Reject => "reject",
            Self::Expire => "expire",
        };
        f.write_str(s)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Unit uid.
    pub unit_uid: String,
    /// Unit namespace.
    pub namespace: String,
    /// Group name, if the unit declared one.
    pub group: Option<String>,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Reason or other context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Helper to build an audit event for `unit`.
pub fn build_audit_event(
    unit: &Unit,
    group: Option<&GroupKey>,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        unit_uid: unit.key.uid.clone(),
        namespace: unit.key.namespace.clone(),
        group: group.map(|g| g.name.clone()),
        action,
        created_at_ms: now_ms(),
        detail,
    }
}
