//! Whole-application state and its persisted subset.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::filters::TaskFilters;
use crate::project::Project;
use crate::task::Task;
use crate::user::User;

/// Format version written into every [`PersistedState`].
pub const PERSISTED_STATE_VERSION: u32 = 1;

/// Everything the store knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_user: Option<User>,
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub current_project: Option<Project>,
    pub current_board: Option<Board>,
    /// Flat task collection. The only place task fields are stored.
    pub tasks: Vec<Task>,
    pub filters: TaskFilters,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// The slice of [`AppState`] that survives between sessions.
///
/// Current project, board, filters and the loading/error flags are left
/// out on purpose and come back empty after a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub current_user: Option<User>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

const fn legacy_version() -> u32 {
    PERSISTED_STATE_VERSION
}

impl PersistedState {
    /// Picks the persistable fields out of `state`.
    #[must_use]
    pub fn partialize(state: &AppState) -> Self {
        Self {
            version: PERSISTED_STATE_VERSION,
            current_user: state.current_user.clone(),
            users: state.users.clone(),
            projects: state.projects.clone(),
            tasks: state.tasks.clone(),
        }
    }

    /// Rebuilds a full state, leaving every non-persisted field at its default.
    #[must_use]
    pub fn hydrate(self) -> AppState {
        AppState {
            current_user: self.current_user,
            users: self.users,
            projects: self.projects,
            tasks: self.tasks,
            ..AppState::default()
        }
    }
}

impl From<&AppState> for PersistedState {
    fn from(state: &AppState) -> Self {
        Self::partialize(state)
    }
}
