//! Admission plugin configuration.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, DEFAULT_GROUP_LABEL};

/// Environment variable prefix read by [`AdmissionConfig::from_env`].
pub const ENV_PREFIX: &str = "GANG_";

/// Configuration for the gang admission plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Plugin name, passed as the admitter id when siblings are released.
    pub plugin_name: String,
    /// Label key carrying a unit's group name.
    pub group_label: String,
    /// Timeout for groups whose record does not set one.
    pub default_schedule_timeout_secs: u64,
    /// Period of the expiry sweep.
    pub expiry_sweep_interval_ms: u64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            plugin_name: "coscheduling".into(),
            group_label: DEFAULT_GROUP_LABEL.into(),
            default_schedule_timeout_secs: 10,
            expiry_sweep_interval_ms: 500,
        }
    }
}

impl AdmissionConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.plugin_name.trim().is_empty() {
            return Err("plugin_name must not be empty".into());
        }
        if self.group_label.trim().is_empty() {
            return Err("group_label must not be empty".into());
        }
        if self.expiry_sweep_interval_ms == 0 {
            return Err("expiry_sweep_interval_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Default schedule timeout as a duration.
    pub const fn default_schedule_timeout(&self) -> Duration {
        Duration::from_secs(self.default_schedule_timeout_secs)
    }

    /// Expiry sweep period as a duration.
    pub const fn expiry_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.expiry_sweep_interval_ms)
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from defaults overridden by `GANG_*` environment
    /// variables, loading a `.env` file first if one exists.
    ///
    /// Recognized: `GANG_PLUGIN_NAME`, `GANG_GROUP_LABEL`,
    /// `GANG_DEFAULT_SCHEDULE_TIMEOUT_SECS`, `GANG_EXPIRY_SWEEP_INTERVAL_MS`.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut cfg = Self::default();

        if let Some(v) = var("PLUGIN_NAME") {
            cfg.plugin_name = v;
        }
        if let Some(v) = var("GROUP_LABEL") {
            cfg.group_label = v;
        }
        if let Some(v) = var("DEFAULT_SCHEDULE_TIMEOUT_SECS") {
            cfg.default_schedule_timeout_secs = v
                .parse()
                .with_context(|| format!("{ENV_PREFIX}DEFAULT_SCHEDULE_TIMEOUT_SECS={v:?}"))?;
        }
        if let Some(v) = var("EXPIRY_SWEEP_INTERVAL_MS") {
            cfg.expiry_sweep_interval_ms = v
                .parse()
                .with_context(|| format!("{ENV_PREFIX}EXPIRY_SWEEP_INTERVAL_MS={v:?}"))?;
        }

        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
