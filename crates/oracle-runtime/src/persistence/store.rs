//! Snapshot storage port and adapters.

use super::{PersistedState, PersistenceError};
use parking_lot::RwLock;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where snapshots live.
pub trait SnapshotStore: Send + Sync {
    /// Latest snapshot bytes, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the snapshot. Readers see the old or the new bytes, never a
    /// mix.
    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError>;

    /// Decode the latest snapshot.
    fn load_state(&self) -> Result<Option<PersistedState>, PersistenceError> {
        self.load()?
            .map(|bytes| PersistedState::decode(&bytes))
            .transpose()
    }

    /// Encode and save `state`.
    fn save_state(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        self.save(&state.encode()?)
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Single snapshot file, replaced by write-to-temp then rename.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Store at `path`; the parent directory must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError {
        let path = path.to_path_buf();
        move |source| PersistenceError::Io { path, source }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(&self.path)(e)),
        }
    }

    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp).map_err(self.io_error(&temp))?;
            file.write_all(bytes).map_err(self.io_error(&temp))?;
            file.sync_all().map_err(self.io_error(&temp))?;
        }
        fs::rename(&temp, &self.path).map_err(self.io_error(&self.path))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Snapshot written");
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Snapshot held in memory, for tests and ephemeral nodes.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    bytes: RwLock<Option<Vec<u8>>>,
}

impl InMemorySnapshotStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.bytes.read().clone())
    }

    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        *self.bytes.write() = Some(bytes.to_vec());
        Ok(())
    }
}
