//! API-facing response models for a placement pipeline adapter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Decision, GangPlugin, Unit};

/// Status code reported to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermitCode {
    /// Proceed to binding.
    Success,
    /// Hold the unit; it may be released or time out.
    Wait,
    /// Non-retryable scheduling error.
    Error,
}

/// Permit result in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitResponse {
    /// Outcome.
    pub code: PermitCode,
    /// Reason for `Wait` and `Error`.
    pub reason: Option<String>,
    /// How long a waiting unit may wait, in milliseconds.
    pub timeout_ms: u64,
}

impl From<(Decision, Duration)> for PermitResponse {
    fn from((decision, timeout): (Decision, Duration)) -> Self {
        let code = match decision {
            Decision::Admit => PermitCode::Success,
            Decision::Suspend(_) => PermitCode::Wait,
            Decision::Reject(_) => PermitCode::Error,
        };
        let reason = Some(decision.reason()).filter(|r| !r.is_empty());
        Self {
            code,
            reason,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Run the permit gate for `unit` and convert the outcome.
pub fn permit_unit(plugin: &GangPlugin, unit: &Unit) -> PermitResponse {
    plugin.permit(unit).into()
}
