//! Telemetry helpers for structured logging and tracing.

/// Initialize tracing. Embedders usually install their own subscriber; this
/// helper installs a default env-filtered fmt subscriber if none is set.
///
/// The filter is read from `RUST_LOG`, e.g. `RUST_LOG=gang_admission=debug`.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .try_init();
}
