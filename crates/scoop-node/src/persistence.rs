//! Snapshot file persistence.
//!
//! The whole store is written as one JSON document after each mutating request
//! and read back once at startup.

use parking_lot::Mutex;
use scoop_store::{ContentStore, Snapshot, StoreError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The file exists but could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// The snapshot could not be written.
    #[error("failed to write snapshot {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// The file does not hold a valid snapshot.
    #[error("invalid snapshot {path}: {source}")]
    Decode { path: PathBuf, source: StoreError },

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(StoreError),
}

/// A JSON file holding a store [`Snapshot`].
///
/// Writes go to a temporary file in the same directory which then replaces the
/// target, so readers never observe a partial snapshot. Writes are serialized.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SnapshotFile {
    /// Creates a handle for the snapshot at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, or `None` if the file does not exist yet.
    pub fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Snapshot::from_json(&data)
            .map(Some)
            .map_err(|source| PersistenceError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes a snapshot.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock();
        self.write(snapshot)
    }

    /// Writes the current state of `store`.
    ///
    /// The snapshot is taken while holding the write lock, so the file always
    /// ends up with the state seen by the last writer.
    pub fn persist(&self, store: &ContentStore) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock();
        self.write(&store.snapshot())
    }

    fn write(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let data = snapshot.to_json().map_err(PersistenceError::Encode)?;
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&data).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), bytes = data.len(), "Snapshot saved");
        Ok(())
    }
}
