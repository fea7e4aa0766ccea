//! Tests for audit sink

use gang_admission::core::{build_audit_event, AuditAction, AuditSink, GroupKey, InMemoryAuditSink, Unit};

fn unit(uid: &str) -> Unit {
    Unit::new("ns1", "worker", uid).in_group("pg1")
}

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);
    let group = GroupKey::new("ns1", "pg1");

    sink.record(build_audit_event(
        &unit("uid-1"),
        Some(&group),
        AuditAction::Suspend,
        Some("waiting for quorum".to_string()),
    ));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].unit_uid, "uid-1");
    assert_eq!(events[0].namespace, "ns1");
    assert_eq!(events[0].group.as_deref(), Some("pg1"));
    assert_eq!(events[0].action, AuditAction::Suspend);
    assert_eq!(events[0].detail.as_deref(), Some("waiting for quorum"));
    assert!(events[0].created_at_ms > 0);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    for uid in ["uid-1", "uid-2", "uid-3"] {
        sink.record(build_audit_event(&unit(uid), None, AuditAction::Admit, None));
    }

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].unit_uid, "uid-2"); // First one popped
    assert_eq!(events[1].unit_uid, "uid-3");
}

#[test]
fn test_zero_capacity_sink_keeps_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event(&unit("uid-1"), None, AuditAction::Reject, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_audit_event_serializes() {
    let event = build_audit_event(&unit("uid-1"), None, AuditAction::Expire, None);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "expire");
    assert_eq!(json["unit_uid"], "uid-1");
    assert_eq!(AuditAction::Release.to_string(), "release");
}
