//! Thread-safe handle around a [`TaskStore`].

use std::sync::Arc;

use parking_lot::Mutex;
use taskboard_model::AppState;

use super::TaskStore;

/// Cloneable handle that serializes all access to one [`TaskStore`].
///
/// Each call holds the lock for the whole operation, including listener
/// notification, so mutations from different threads never interleave.
/// Listeners must not call back into the same handle.
#[derive(Clone)]
pub struct SharedTaskStore {
    inner: Arc<Mutex<TaskStore>>,
}

impl SharedTaskStore {
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut TaskStore) -> R) -> R {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    /// The current snapshot. Cheap; does not copy the state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(self.inner.lock().state())
    }
}
