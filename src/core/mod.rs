//! Core admission abstractions: units, group resolution, quorum evaluation,
//! suspension tracking, and queue ordering.

pub mod audit;
pub mod collaborators;
pub mod error;
pub mod evaluator;
pub mod ordering;
pub mod plugin;
pub mod registry;
pub mod resolver;
pub mod unit;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use collaborators::{
    GroupConfigStore, GroupRecord, InventoryView, WaitingUnitHooks, MIN_AVAILABLE_FIELD,
    SCHEDULE_TIMEOUT_FIELD,
};
pub use error::{AdmissionError, AppResult};
pub use evaluator::{Decision, QuorumEvaluator, Rejection};
pub use ordering::{OrderKey, QueueOrderer};
pub use plugin::GangPlugin;
pub use registry::{Suspension, SuspensionRegistry};
pub use resolver::{GroupConfig, GroupConfigResolver, DEFAULT_SCHEDULE_TIMEOUT};
pub use unit::{GroupKey, GroupSelector, Unit, UnitKey, UnitPhase, DEFAULT_GROUP_LABEL};
