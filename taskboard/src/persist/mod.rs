//! Saving and restoring the persisted slice of application state.
//!
//! The in-memory store never waits on storage. [`PersistHandle::attach`]
//! subscribes to a [`TaskStore`]; each committed snapshot is reduced to a
//! [`PersistedState`] and handed to a background task over a `watch`
//! channel, so a burst of mutations collapses into one write of the latest
//! record. Write failures are logged and the in-memory state is kept.

pub mod backend;

use std::path::PathBuf;
use std::sync::{Arc, Weak};

use taskboard_model::codec::{self, CodecError, Format};
use taskboard_model::PersistedState;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::{SubscriptionId, TaskStore};

pub use backend::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};

/// Storage key the application state is saved under.
pub const STORAGE_KEY: &str = "taskboard-state";

/// Errors that can occur while saving or loading state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing a storage file failed.
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The record could not be encoded or decoded.
    #[error("record codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Encodes records in one [`Format`] and stores them under one key.
pub struct Persister<S: SnapshotStore> {
    store: S,
    format: Format,
    key: String,
}

impl<S: SnapshotStore> Persister<S> {
    /// Creates a persister writing to [`STORAGE_KEY`].
    #[must_use]
    pub fn new(store: S, format: Format) -> Self {
        Self {
            store,
            format,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Uses `key` instead of [`STORAGE_KEY`].
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Loads the saved record, or `None` if nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the storage read fails or the record
    /// cannot be decoded.
    pub async fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let Some(bytes) = self.store.load(&self.key).await? else {
            return Ok(None);
        };
        Ok(Some(codec::decode(self.format, &bytes)?))
    }

    /// Writes `record`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or the storage write fails.
    pub async fn save(&self, record: &PersistedState) -> Result<(), PersistError> {
        let bytes = codec::encode(self.format, record)?;
        self.store.save(&self.key, bytes).await
    }

    /// Deletes the saved record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the storage delete fails.
    pub async fn clear(&self) -> Result<(), PersistError> {
        self.store.remove(&self.key).await
    }
}

/// Handle to a running background persister.
///
/// Dropping the handle without [`shutdown`](Self::shutdown) stops the
/// writer after the record already queued, but nothing waits for it.
pub struct PersistHandle {
    tx: Arc<watch::Sender<Option<PersistedState>>>,
    task: JoinHandle<usize>,
}

/// Starts the background writer for `persister`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_persister<S>(persister: Arc<Persister<S>>) -> PersistHandle
where
    S: SnapshotStore + 'static,
{
    let (tx, rx) = watch::channel(None);
    let task = tokio::spawn(run_writer(persister, rx));
    PersistHandle {
        tx: Arc::new(tx),
        task,
    }
}

async fn run_writer<S: SnapshotStore>(
    persister: Arc<Persister<S>>,
    mut rx: watch::Receiver<Option<PersistedState>>,
) -> usize {
    let mut written = 0;
    while rx.changed().await.is_ok() {
        let latest = rx.borrow_and_update().clone();
        let Some(record) = latest else {
            continue;
        };
        match persister.save(&record).await {
            Ok(()) => {
                written += 1;
                tracing::debug!(
                    key = %persister.key,
                    tasks = record.tasks.len(),
                    "state persisted"
                );
            }
            Err(err) => {
                tracing::warn!(
                    key = %persister.key,
                    error = %err,
                    "failed to persist state, in-memory state kept"
                );
            }
        }
    }
    written
}

impl PersistHandle {
    /// Queues `record` for writing, replacing any record not yet written.
    pub fn submit(&self, record: PersistedState) {
        self.tx.send_replace(Some(record));
    }

    /// Subscribes to `store` so every committed snapshot gets persisted.
    ///
    /// Commits that leave the persisted slice unchanged (filters, loading
    /// and error flags, board edits) queue nothing. The listener holds only
    /// a weak reference to the channel and goes quiet once the handle is
    /// shut down.
    pub fn attach(&self, store: &mut TaskStore) -> SubscriptionId {
        let tx: Weak<watch::Sender<Option<PersistedState>>> = Arc::downgrade(&self.tx);
        store.subscribe(move |state| {
            let Some(tx) = tx.upgrade() else {
                return;
            };
            let record = PersistedState::partialize(state);
            tx.send_if_modified(|slot| {
                if slot.as_ref() == Some(&record) {
                    return false;
                }
                *slot = Some(record);
                true
            });
        })
    }

    /// Closes the channel and waits for the pending record to be written.
    /// Returns the number of successful writes.
    pub async fn shutdown(self) -> usize {
        let Self { tx, task } = self;
        drop(tx);
        match task.await {
            Ok(written) => written,
            Err(err) => {
                tracing::error!(error = %err, "persister task failed");
                0
            }
        }
    }
}
