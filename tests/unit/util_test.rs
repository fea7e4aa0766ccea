//! Tests for utility functions

use std::time::Duration;

use gang_admission::util::{deadline_after, init_tracing, now_ms};

#[test]
fn test_deadline_after() {
    assert_eq!(deadline_after(1_000, Duration::from_secs(10)), 11_000);
    assert_eq!(deadline_after(1_000, Duration::ZERO), 1_000);
    assert_eq!(deadline_after(u128::MAX, Duration::from_secs(1)), u128::MAX);
}

#[test]
fn test_now_ms_tracks_wall_clock() {
    let before = now_ms();
    std::thread::sleep(Duration::from_millis(5));
    let after = now_ms();
    assert!(after >= before + 5);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::debug!("tracing initialized twice");
}
