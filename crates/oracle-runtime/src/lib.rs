//! # Oracle Runtime Library
//!
//! Building blocks of the `oracle-runtime` binary, exposed for tests.
//!
//! - `config` - JSON configuration with environment overrides
//! - `container` - service construction and shared infrastructure
//! - `persistence/` - versioned snapshots and the data directory lock
//! - `handlers` - event bus subscribers (metrics, audit log)
//! - `runtime` - startup, restore, shutdown

pub mod config;
pub mod container;
pub mod handlers;
pub mod persistence;
pub mod runtime;

pub use config::{ConfigError, OracleConfig};
pub use container::{ContainerError, OracleContainer};
pub use persistence::{
    CommitJournal, DataDirLock, FileSnapshotStore, InMemorySnapshotStore, PersistedState, PersistenceError,
    SnapshotStore, STATE_VERSION,
};
pub use runtime::{OracleRuntime, RuntimeError};
