//! Wall-clock helpers shared by suspension deadlines and audit records.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// Returns 0 if the system clock is set before the epoch.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Absolute deadline `timeout` after `from_ms`.
pub fn deadline_after(from_ms: u128, timeout: Duration) -> u128 {
    from_ms.saturating_add(timeout.as_millis())
}
