//! Key-value storage backends for persisted records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::PersistError;

/// Durable storage for opaque, named byte records.
///
/// Implementations include:
/// - [`InMemorySnapshotStore`]: process-local, for tests and ephemeral sessions
/// - [`FileSnapshotStore`]: one file per key in a data directory
pub trait SnapshotStore: Send + Sync {
    /// Reads the record stored under `key`, or `None` if there is none.
    fn load(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, PersistError>> + Send;

    /// Replaces the record stored under `key`.
    fn save(
        &self,
        key: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<(), PersistError>> + Send;

    /// Deletes the record stored under `key`. Missing records are not an error.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<(), PersistError>> + Send;
}

/// In-memory [`SnapshotStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistError> {
        self.records.lock().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.records.lock().await.remove(key);
        Ok(())
    }
}

/// Stores each record as `<dir>/<key>.<extension>`.
///
/// Writes go to a sibling temporary file first and are renamed into place,
/// so a crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
    extension: &'static str,
}

impl FileSnapshotStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            dir: dir.into(),
            extension,
        }
    }

    /// Directory holding the record files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{}", self.extension))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(key);
        let tmp = path.with_extension(format!("{}.tmp", self.extension));
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
