//! # Data Directory Locking
//!
//! Two nodes sharing one data directory would overwrite each other's
//! snapshots and could double-fulfill. The lock file holds the owner's
//! PID and an exclusive `fs2` lock for as long as the guard lives.

use super::PersistenceError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive lock on a data directory, released on drop.
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DataDirLock {
    /// Lock file name
    pub const LOCK_FILE: &'static str = "LOCK";

    /// Acquire the lock, failing fast if another process holds it.
    pub fn acquire(data_dir: &Path) -> Result<Self, PersistenceError> {
        let path = data_dir.join(Self::LOCK_FILE);
        let io = |source: std::io::Error| PersistenceError::Io {
            path: path.clone(),
            source,
        };

        // no truncate before locking: the holder's PID must survive
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(io)?;

        if file.try_lock_exclusive().is_err() {
            let mut text = String::new();
            let pid = file
                .read_to_string(&mut text)
                .ok()
                .and_then(|_| text.trim().parse().ok());
            return Err(PersistenceError::AlreadyLocked {
                pid,
                path: path.clone(),
            });
        }

        let pid = std::process::id();
        file.set_len(0).map_err(io)?;
        file.seek(SeekFrom::Start(0)).map_err(io)?;
        writeln!(file, "{pid}").map_err(io)?;
        file.sync_all().map_err(io)?;

        debug!(path = %path.display(), pid, "Data directory locked");
        Ok(Self { file, path, pid })
    }

    /// PID written into the lock file.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}
