//! # Persistence
//!
//! Both services export their full state; the runtime bundles the two
//! into one [`PersistedState`], wraps it in a version-tagged envelope and
//! hands the bytes to a [`SnapshotStore`].
//!
//! [`CommitJournal`] sits between the services and the event bus and
//! saves a snapshot whenever a committed change is published.
//!
//! Snapshots are only loaded when the envelope version matches
//! [`STATE_VERSION`]. Services validate restored state themselves before
//! accepting it.

pub mod journal;
pub mod lock;
pub mod snapshot;
pub mod store;

pub use journal::CommitJournal;
pub use lock::DataDirLock;
pub use snapshot::{PersistedState, STATE_VERSION};
pub use store::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};

use std::path::PathBuf;
use thiserror::Error;

/// Snapshot and lock failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes are not a snapshot.
    #[error("snapshot codec error: {0}")]
    Codec(String),

    /// Snapshot written by an incompatible version.
    #[error("unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Another process holds the data directory.
    #[error("data directory already in use: {path} (pid {pid:?})")]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },
}
