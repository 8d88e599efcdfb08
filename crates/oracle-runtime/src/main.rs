//! # xOracle Node
//!
//! Loads configuration, restores the last snapshot, saves after every
//! committed change and writes a final snapshot on Ctrl+C.
//!
//! Configuration comes from the JSON file named by `XO_CONFIG`;
//! `XO_CHAIN_ID`, `XO_DATA_DIR` and the `XO_*` telemetry variables
//! override it.

use anyhow::{Context, Result};
use oracle_runtime::{OracleConfig, OracleRuntime};
use oracle_telemetry::init_telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = OracleConfig::load().context("Failed to load configuration")?;
    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  xOracle Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let runtime = OracleRuntime::open(config).context("Failed to start oracle node")?;
    runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    runtime
        .shutdown()
        .await
        .context("Failed to persist final snapshot")?;
    Ok(())
}
