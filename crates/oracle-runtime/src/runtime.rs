//! # Oracle Runtime
//!
//! ## Startup Sequence
//!
//! 1. Create the data directory and take its lock
//! 2. Build both services from configuration
//! 3. Restore the last snapshot, if any
//! 4. Attach the store to the commit journal; from here every committed
//!    change is saved before its event is published
//! 5. Start bus handlers
//!
//! ## Shutdown Sequence
//!
//! 1. Signal handlers to stop
//! 2. Write a final snapshot
//! 3. Release the lock

use crate::config::OracleConfig;
use crate::container::{ContainerError, OracleContainer};
use crate::handlers::MetricsHandler;
use crate::persistence::{DataDirLock, FileSnapshotStore, PersistenceError, SnapshotStore};
use shared_types::TimeSource;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Runtime failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Service construction or restore failed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Snapshot or lock failure.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// A running oracle node.
pub struct OracleRuntime {
    container: Arc<OracleContainer>,
    _lock: Option<DataDirLock>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl OracleRuntime {
    /// Lock `storage.data_dir`, build services and restore the snapshot
    /// stored there.
    pub fn open(config: OracleConfig) -> Result<Self, RuntimeError> {
        let data_dir = config.storage.data_dir.clone();
        std::fs::create_dir_all(&data_dir).map_err(|source| PersistenceError::Io {
            path: data_dir.clone(),
            source,
        })?;
        let lock = DataDirLock::acquire(&data_dir)?;
        let store = Arc::new(FileSnapshotStore::new(config.storage.snapshot_path()));

        let mut runtime = Self::with_store(OracleContainer::new(config)?, store)?;
        runtime._lock = Some(lock);
        Ok(runtime)
    }

    /// Build on `clock` with an explicit store and no directory lock.
    pub fn with_clock(
        config: OracleConfig,
        clock: Arc<dyn TimeSource>,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self, RuntimeError> {
        Self::with_store(OracleContainer::with_clock(config, clock)?, store)
    }

    fn with_store(
        container: OracleContainer,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self, RuntimeError> {
        match store.load_state()? {
            Some(state) => {
                container.restore(state)?;
                info!(
                    latest_request_id = container.price_oracle.export_state().latest_request_id,
                    "Snapshot restored"
                );
            }
            None => info!("No snapshot found, starting fresh"),
        }
        container.journal.attach(store);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            container: Arc::new(container),
            _lock: None,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Spawn bus handlers. Requires a Tokio runtime.
    pub fn start(&self) {
        match oracle_telemetry::metrics() {
            Ok(_) if !self.container.config.telemetry.metrics_enabled => {
                info!("Metrics disabled, handler not started");
            }
            Ok(metrics) => {
                let handler = MetricsHandler::new(&self.container.event_bus, metrics);
                let mut shutdown = self.shutdown_rx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = handler.run() => {}
                        _ = shutdown.changed() => {
                            info!("[metrics] Shutdown signal received");
                        }
                    }
                });
            }
            Err(e) => warn!(error = %e, "Metrics unavailable, handler not started"),
        }

        info!(
            chain_id = self.container.config.chain.chain_id,
            data_dir = %self.container.config.storage.data_dir.display(),
            "Oracle node running"
        );
    }

    /// Write a snapshot of both services now.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        self.container.journal.checkpoint()
    }

    /// Stop handlers and write a final snapshot.
    pub async fn shutdown(self) -> Result<(), PersistenceError> {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        tokio::task::yield_now().await;

        self.persist()?;
        info!("Shutdown complete");
        Ok(())
    }

    /// Services and shared infrastructure.
    pub fn container(&self) -> Arc<OracleContainer> {
        Arc::clone(&self.container)
    }
}
