//! Error types for admission decisions.

use thiserror::Error;

use crate::core::unit::UnitPhase;

/// Errors produced by admission components.
///
/// Every variant that reaches a placement pipeline does so as a `Reject`;
/// none of them is retried inside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// A unit references a group that has no configuration record.
    #[error("group config {namespace}/{group} not found, create the group config first")]
    ConfigNotFound {
        /// Namespace searched.
        namespace: String,
        /// Group name searched.
        group: String,
    },
    /// A configuration field is present but cannot be parsed.
    #[error("group config {namespace}/{group} has invalid field `{field}`={value:?}: {reason}")]
    InvalidConfig {
        /// Namespace of the group.
        namespace: String,
        /// Group name.
        group: String,
        /// Offending field key.
        field: String,
        /// Raw field value.
        value: String,
        /// Parse failure detail.
        reason: String,
    },
    /// Unexpected failure reading external state.
    #[error("internal error: {0}")]
    Internal(String),
    /// A required collaborator was not supplied at construction.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    /// A unit phase change that the lifecycle does not allow.
    #[error("unit {unit} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// Unit identity.
        unit: String,
        /// Current phase.
        from: UnitPhase,
        /// Requested phase.
        to: UnitPhase,
    },
    /// Plugin configuration failed validation.
    #[error("plugin config invalid: {0}")]
    PluginConfig(String),
    /// The admission queue is at its maximum depth.
    #[error("admission queue full (max depth {0})")]
    QueueFull(usize),
}

impl AdmissionError {
    /// Wrap a collaborator failure, keeping the full cause chain.
    pub fn internal(err: &anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }

    /// Whether an operator must fix group configuration to clear this error.
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. } | Self::InvalidConfig { .. })
    }
}

/// Application-facing result using anyhow for collaborator reads.
pub type AppResult<T> = Result<T, anyhow::Error>;
