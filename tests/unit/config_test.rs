//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use gang_admission::config::AdmissionConfig;
use gang_admission::core::DEFAULT_GROUP_LABEL;

#[test]
fn test_admission_config_defaults() {
    let config = AdmissionConfig::default();
    assert_eq!(config.plugin_name, "coscheduling");
    assert_eq!(config.group_label, DEFAULT_GROUP_LABEL);
    assert_eq!(config.default_schedule_timeout(), Duration::from_secs(10));
    assert_eq!(config.expiry_sweep_interval(), Duration::from_millis(500));
    assert!(config.validate().is_ok());
}

#[test]
fn test_admission_config_invalid_fields() {
    let empty_name = AdmissionConfig {
        plugin_name: " ".to_string(),
        ..AdmissionConfig::default()
    };
    assert!(empty_name.validate().is_err());

    let empty_label = AdmissionConfig {
        group_label: String::new(),
        ..AdmissionConfig::default()
    };
    assert!(empty_label.validate().is_err());

    let zero_sweep = AdmissionConfig {
        expiry_sweep_interval_ms: 0,
        ..AdmissionConfig::default()
    };
    assert!(zero_sweep.validate().is_err());

    let zero_timeout = AdmissionConfig {
        default_schedule_timeout_secs: 0,
        ..AdmissionConfig::default()
    };
    assert!(zero_timeout.validate().is_ok());
}

#[test]
fn test_admission_config_from_json() {
    let json = r#"{
        "plugin_name": "gang",
        "default_schedule_timeout_secs": 30
    }"#;

    let config = AdmissionConfig::from_json_str(json).unwrap();
    assert_eq!(config.plugin_name, "gang");
    assert_eq!(config.default_schedule_timeout_secs, 30);
    assert_eq!(config.group_label, DEFAULT_GROUP_LABEL);

    assert!(AdmissionConfig::from_json_str(r#"{"expiry_sweep_interval_ms": 0}"#).is_err());
    let err = AdmissionConfig::from_json_str("not json").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_admission_config_from_lookup() {
    let vars = HashMap::from([
        ("GANG_GROUP_LABEL", "team.example.com/gang"),
        ("GANG_DEFAULT_SCHEDULE_TIMEOUT_SECS", "45"),
    ]);
    let config = AdmissionConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.group_label, "team.example.com/gang");
    assert_eq!(config.default_schedule_timeout_secs, 45);
    assert_eq!(config.plugin_name, "coscheduling");
}

#[test]
fn test_admission_config_from_lookup_rejects_bad_values() {
    let bad_number = AdmissionConfig::from_lookup(|k| {
        (k == "GANG_EXPIRY_SWEEP_INTERVAL_MS").then(|| "soon".to_string())
    })
    .unwrap_err();
    assert!(format!("{bad_number:#}").contains("GANG_EXPIRY_SWEEP_INTERVAL_MS"));

    let empty_label =
        AdmissionConfig::from_lookup(|k| (k == "GANG_GROUP_LABEL").then(String::new));
    assert!(empty_label.is_err());
}
