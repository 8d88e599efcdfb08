//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_SERVICE_NAME: &str = "xoracle";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging and metrics settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// `EnvFilter` directive, e.g. `info` or `xo_05_request_registry=debug`
    pub log_level: String,

    /// JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Register and update Prometheus counters
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `XO_SERVICE_NAME`: Service name (default: xoracle)
    /// - `XO_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `XO_JSON_LOGS`: JSON output (default: false)
    /// - `XO_METRICS_ENABLED`: Prometheus counters (default: true)
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keeping current values for unset keys.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(name) = lookup("XO_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Some(level) = lookup("XO_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            self.log_level = level;
        }
        if let Some(flag) = lookup("XO_JSON_LOGS") {
            self.json_logs = parse_flag(&flag, self.json_logs);
        }
        if let Some(flag) = lookup("XO_METRICS_ENABLED") {
            self.metrics_enabled = parse_flag(&flag, self.metrics_enabled);
        }
        self
    }
}

fn parse_flag(value: &str, fallback: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => fallback,
    }
}
