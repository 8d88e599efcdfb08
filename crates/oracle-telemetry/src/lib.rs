//! # Oracle Telemetry
//!
//! Structured logging and Prometheus counters for xOracle nodes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oracle_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // services run here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XO_SERVICE_NAME` | `xoracle` | Service name in log lines |
//! | `XO_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `XO_JSON_LOGS` | `false` | JSON lines output |
//! | `XO_METRICS_ENABLED` | `true` | Prometheus counters |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use metrics::{gather_metrics, metrics, register_metrics, OracleMetrics};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    Metrics(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging and, when enabled, create the metrics.
///
/// Hold the guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    if config.metrics_enabled {
        register_metrics()?;
    }
    logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
        metrics_enabled: config.metrics_enabled,
    })
}

/// Keeps telemetry active; logs shutdown on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
    metrics_enabled: bool,
}

impl TelemetryGuard {
    /// True when counters were created at startup.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
