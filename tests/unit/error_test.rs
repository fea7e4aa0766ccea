//! Tests for error display

use gang_admission::core::{AdmissionError, UnitPhase};

#[test]
fn test_config_not_found_display() {
    let err = AdmissionError::ConfigNotFound {
        namespace: "ns1".to_string(),
        group: "pg1".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "group config ns1/pg1 not found, create the group config first"
    );
    assert!(err.is_config_error());
}

#[test]
fn test_invalid_config_display() {
    let err = AdmissionError::InvalidConfig {
        namespace: "ns1".to_string(),
        group: "pg1".to_string(),
        field: "minAvailable".to_string(),
        value: "abc".to_string(),
        reason: "invalid digit found in string".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("ns1/pg1"));
    assert!(msg.contains("`minAvailable`=\"abc\""));
    assert!(msg.contains("invalid digit"));
    assert!(err.is_config_error());
}

#[test]
fn test_operational_errors_display() {
    assert_eq!(
        AdmissionError::QueueFull(32).to_string(),
        "admission queue full (max depth 32)"
    );
    assert_eq!(
        AdmissionError::MissingCollaborator("inventory view").to_string(),
        "missing collaborator: inventory view"
    );
    assert_eq!(
        AdmissionError::PluginConfig("group_label must not be empty".to_string()).to_string(),
        "plugin config invalid: group_label must not be empty"
    );
    assert!(!AdmissionError::Internal("boom".to_string()).is_config_error());
}

#[test]
fn test_invalid_transition_display() {
    let err = AdmissionError::InvalidTransition {
        unit: "ns1/a (uid-a)".to_string(),
        from: UnitPhase::Admitted,
        to: UnitPhase::Suspended,
    };
    assert_eq!(
        err.to_string(),
        "unit ns1/a (uid-a) cannot move from Admitted to Suspended"
    );
}
