//! One CLI invocation: load saved state, run a command, flush the save.

use std::sync::Arc;

use taskboard_model::{PersistedState, UserId};

use crate::commands::{self, CommandError};
use crate::config::{Command, TaskboardConfig};
use crate::persist::{FileSnapshotStore, PersistError, PersistHandle, Persister, spawn_persister};
use crate::store::TaskStore;

/// Errors that abort a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    /// A command needs storage but persistence is turned off.
    #[error("`{0}` needs saved state, but persistence is disabled (--ephemeral or [storage] enabled = false)")]
    PersistenceDisabled(&'static str),
}

/// Loads the store, runs `command`, and waits for any resulting save.
///
/// # Errors
///
/// Returns [`SessionError`] if the command fails or storage cannot be
/// cleared. A record that fails to load is reported, not returned.
pub async fn run(config: &TaskboardConfig, command: &Command) -> Result<String, SessionError> {
    let persister = Arc::new(Persister::new(
        FileSnapshotStore::new(&config.data_dir, config.format.extension()),
        config.format,
    ));

    if *command == Command::Reset {
        if !config.persist {
            return Err(SessionError::PersistenceDisabled("reset"));
        }
        persister.clear().await?;
        return Ok(commands::execute(
            &mut TaskStore::default(),
            command,
            config,
            chrono::Utc::now(),
        )?);
    }

    let (saved, load_error) = if config.persist {
        match persister.load().await {
            Ok(saved) => (saved, None),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load saved state");
                (None, Some(e))
            }
        }
    } else {
        (None, None)
    };

    let first_run = saved.is_none();
    let mut store = TaskStore::bootstrap(saved, config.seed_demo);
    if let Some(id) = &config.current_user {
        select_user(&mut store, &UserId::from(id.as_str()));
    }

    // A record that failed to load is left on disk untouched.
    let handle: Option<PersistHandle> = if config.persist && load_error.is_none() {
        let handle = spawn_persister(Arc::clone(&persister));
        handle.attach(&mut store);
        Some(handle)
    } else {
        None
    };
    if let Some(e) = load_error {
        eprintln!("Warning: saved state unreadable, changes will not be saved: {e}");
        store.set_error(Some(e.to_string()));
    }

    let before = Arc::clone(store.state());
    let result = commands::execute(&mut store, command, config, chrono::Utc::now());

    if let Some(handle) = handle {
        // A read-only first run still saves, so the seeded data sticks.
        if first_run && Arc::ptr_eq(&before, store.state()) {
            handle.submit(PersistedState::partialize(store.state()));
        }
        let written = handle.shutdown().await;
        tracing::debug!(written, "persister drained");
    }

    Ok(result?)
}

fn select_user(store: &mut TaskStore, id: &UserId) {
    let user = store.state().users.iter().find(|u| &u.id == id).cloned();
    match user {
        Some(user) => store.set_current_user(user),
        None => {
            tracing::warn!(user = %id, "unknown user, keeping current user");
            eprintln!("Warning: unknown user {id}");
        }
    }
}
