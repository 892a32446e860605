//! The task store: single owner of application state.
//!
//! Every mutation builds the next [`AppState`] from a copy of the current
//! one, publishes it as a fresh `Arc` and then notifies subscribers in
//! subscription order. Snapshots already handed out never change, so
//! consumers can detect changes with [`Arc::ptr_eq`].
//!
//! Operations that address an unknown id return [`StoreError::NotFound`]
//! and publish nothing.

pub mod board;
mod shared;

use std::fmt;
use std::sync::Arc;

use taskboard_model::{
    AppState, Board, PersistedState, Project, ProjectId, ProjectPatch, Status, Task, TaskFilters,
    TaskId, TaskPatch, User, UserId, UserPatch,
};
use thiserror::Error;

use crate::demo;

pub use board::ColumnView;
pub use shared::SharedTaskStore;

/// Which collection an id was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Project,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Project => write!(f, "project"),
            Self::Task => write!(f, "task"),
        }
    }
}

/// Errors returned by store operations. State is unchanged whenever one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No entity with the given id exists.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Collection that was searched.
        kind: EntityKind,
        /// The missing id.
        id: String,
    },
    /// An entity with the given id already exists.
    #[error("{kind} already exists: {id}")]
    AlreadyExists {
        /// Collection that already holds the id.
        kind: EntityKind,
        /// The duplicate id.
        id: String,
    },
}

impl StoreError {
    fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    fn already_exists(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }
}

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Arc<AppState>) + Send>;

/// Owns the canonical [`AppState`] and applies every mutation to it.
pub struct TaskStore {
    state: Arc<AppState>,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl TaskStore {
    /// Creates a store around `initial`. A board in `initial` is reconciled
    /// against its task list.
    #[must_use]
    pub fn new(mut initial: AppState) -> Self {
        if let Some(current) = initial.current_board.as_mut() {
            board::reconcile(current, &initial.tasks);
        }
        Self {
            state: Arc::new(initial),
            version: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Builds the startup store.
    ///
    /// A saved record is hydrated; its first project becomes current and
    /// gets a standard board rebuilt from the task list. When there is no
    /// record, or it holds neither projects nor tasks, the demo project,
    /// board and tasks are loaded if `seed_demo` is set. Saved users are
    /// kept; demo users only fill an empty user list.
    #[must_use]
    pub fn bootstrap(persisted: Option<PersistedState>, seed_demo: bool) -> Self {
        let mut state = persisted.map(PersistedState::hydrate).unwrap_or_default();

        if state.projects.is_empty() && state.tasks.is_empty() {
            if seed_demo {
                demo::seed(&mut state);
            }
            if state.current_user.is_none() {
                state.current_user = state
                    .users
                    .first()
                    .cloned()
                    .or_else(|| demo::users().into_iter().next());
            }
            return Self::new(state);
        }

        if let Some(project) = state.projects.first().cloned() {
            let mut rebuilt = Board::standard(
                format!("{}-board", project.id),
                "Main Board",
                project.id.clone(),
                chrono::Utc::now(),
            );
            board::populate(&mut rebuilt, &state.tasks);
            state.current_project = Some(project);
            state.current_board = Some(rebuilt);
        }
        Self::new(state)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The current state snapshot.
    #[must_use]
    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Number of snapshots published since construction.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Looks up a task in the flat collection.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.state.tasks.iter().find(|t| &t.id == id)
    }

    /// The current board resolved against the task list, or `None` without a board.
    #[must_use]
    pub fn board_view(&self) -> Option<Vec<ColumnView<'_>>> {
        self.state
            .current_board
            .as_ref()
            .map(|b| board::project(b, &self.state.tasks))
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Registers `listener` to run after every published snapshot.
    ///
    /// Listeners run synchronously inside the mutating call and must not
    /// block.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&Arc<AppState>) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Sets the signed-in user.
    pub fn set_current_user(&mut self, user: User) {
        let mut next = self.draft();
        next.current_user = Some(user);
        self.commit("set_current_user", next);
    }

    /// Appends a user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the id is taken.
    pub fn add_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.state.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::already_exists(EntityKind::User, &user.id));
        }
        let mut next = self.draft();
        next.users.push(user);
        self.commit("add_user", next);
        Ok(())
    }

    /// Merges `patch` into the user with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such user exists.
    pub fn update_user(&mut self, id: &UserId, patch: &UserPatch) -> Result<(), StoreError> {
        let index = self
            .state
            .users
            .iter()
            .position(|u| &u.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::User, id))?;
        let mut next = self.draft();
        patch.apply(&mut next.users[index]);
        self.commit("update_user", next);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// Switches the active project. Does not load a board.
    pub fn set_current_project(&mut self, project: Option<Project>) {
        let mut next = self.draft();
        next.current_project = project;
        self.commit("set_current_project", next);
    }

    /// Appends a project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the id is taken.
    pub fn add_project(&mut self, project: Project) -> Result<(), StoreError> {
        if self.state.projects.iter().any(|p| p.id == project.id) {
            return Err(StoreError::already_exists(EntityKind::Project, &project.id));
        }
        let mut next = self.draft();
        next.projects.push(project);
        self.commit("add_project", next);
        Ok(())
    }

    /// Merges `patch` into the project with `id`, both in the collection and
    /// in the current-project slot when it holds the same project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if neither copy has that id.
    pub fn update_project(&mut self, id: &ProjectId, patch: &ProjectPatch) -> Result<(), StoreError> {
        let index = self.state.projects.iter().position(|p| &p.id == id);
        let is_current = self.is_current_project(id);
        if index.is_none() && !is_current {
            return Err(StoreError::not_found(EntityKind::Project, id));
        }

        let mut next = self.draft();
        if let Some(index) = index {
            patch.apply(&mut next.projects[index]);
        }
        if is_current && let Some(current) = next.current_project.as_mut() {
            patch.apply(current);
        }
        self.commit("update_project", next);
        Ok(())
    }

    /// Removes a project, clearing the current project if it was this one.
    /// Tasks are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if neither the collection nor the
    /// current-project slot has that id.
    pub fn delete_project(&mut self, id: &ProjectId) -> Result<(), StoreError> {
        let listed = self.state.projects.iter().any(|p| &p.id == id);
        let is_current = self.is_current_project(id);
        if !listed && !is_current {
            return Err(StoreError::not_found(EntityKind::Project, id));
        }

        let mut next = self.draft();
        next.projects.retain(|p| &p.id != id);
        if is_current {
            next.current_project = None;
        }
        self.commit("delete_project", next);
        Ok(())
    }

    fn is_current_project(&self, id: &ProjectId) -> bool {
        self.state
            .current_project
            .as_ref()
            .is_some_and(|p| &p.id == id)
    }

    // -----------------------------------------------------------------------
    // Boards
    // -----------------------------------------------------------------------

    /// Replaces the active board. Its column membership is reconciled
    /// against the task list.
    pub fn set_current_board(&mut self, board: Option<Board>) {
        self.replace_board("set_current_board", board);
    }

    /// Replaces the active board with an edited copy.
    pub fn update_board(&mut self, board: Board) {
        self.replace_board("update_board", Some(board));
    }

    fn replace_board(&mut self, op: &'static str, board: Option<Board>) {
        let mut next = self.draft();
        next.current_board = board.map(|mut b| {
            board::reconcile(&mut b, &next.tasks);
            b
        });
        self.commit(op, next);
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Appends a task and, with an active board, adds it to the end of the
    /// column for its status. A board without that column is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the id is taken.
    pub fn add_task(&mut self, task: Task) -> Result<(), StoreError> {
        if self.task(&task.id).is_some() {
            return Err(StoreError::already_exists(EntityKind::Task, &task.id));
        }
        let mut next = self.draft();
        if let Some(current) = next.current_board.as_mut()
            && !board::place(current, &task.id, task.status, None)
        {
            tracing::debug!(task_id = %task.id, status = %task.status, "no column for task status");
        }
        next.tasks.push(task);
        self.commit("add_task", next);
        Ok(())
    }

    /// Merges `patch` into a task and refreshes its `updated_at`.
    ///
    /// A status change moves the task to the end of its new column, the
    /// same way [`move_task`](Self::move_task) does without an index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such task exists.
    pub fn update_task(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let index = self.task_index(id)?;
        let mut next = self.draft();

        let task = &mut next.tasks[index];
        let previous = task.status;
        patch.apply(task);
        task.touch();
        let status = task.status;

        if status != previous
            && let Some(current) = next.current_board.as_mut()
        {
            board::place(current, id, status, None);
        }
        self.commit("update_task", next);
        Ok(())
    }

    /// Removes a task from the flat list and from every board column.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such task exists.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let index = self.task_index(id)?;
        let mut next = self.draft();
        next.tasks.remove(index);
        if let Some(current) = next.current_board.as_mut() {
            board::remove(current, id);
        }
        self.commit("delete_task", next);
        Ok(())
    }

    /// Sets a task's status and moves it to the matching column.
    ///
    /// With `index` the task is inserted at that position in the destination
    /// column, clamped to its length; otherwise it is appended. Moving within
    /// the same column with an index reorders it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such task exists.
    pub fn move_task(
        &mut self,
        id: &TaskId,
        status: Status,
        index: Option<usize>,
    ) -> Result<(), StoreError> {
        let position = self.task_index(id)?;
        let mut next = self.draft();

        let task = &mut next.tasks[position];
        let from = task.status;
        task.status = status;
        task.touch();

        if let Some(current) = next.current_board.as_mut() {
            board::place(current, id, status, index);
        }
        tracing::debug!(task_id = %id, %from, to = %status, ?index, "task moved");
        self.commit("move_task", next);
        Ok(())
    }

    /// Sets a task's assignee.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such task exists.
    pub fn assign_task(&mut self, id: &TaskId, assignee: UserId) -> Result<(), StoreError> {
        self.update_task(id, &TaskPatch::assign(Some(assignee)))
    }

    fn task_index(&self, id: &TaskId) -> Result<usize, StoreError> {
        self.state
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Task, id))
    }

    // -----------------------------------------------------------------------
    // Filters and UI flags
    // -----------------------------------------------------------------------

    /// Overwrites the filter criteria set in `patch`; others are kept.
    pub fn set_filters(&mut self, patch: TaskFilters) {
        let mut next = self.draft();
        next.filters.merge(patch);
        self.commit("set_filters", next);
    }

    /// Resets all filter criteria.
    pub fn clear_filters(&mut self) {
        let mut next = self.draft();
        next.filters = TaskFilters::default();
        self.commit("clear_filters", next);
    }

    /// Sets the loading flag shown while surrounding I/O is in flight.
    pub fn set_loading(&mut self, loading: bool) {
        let mut next = self.draft();
        next.is_loading = loading;
        self.commit("set_loading", next);
    }

    /// Sets or clears the error message reported by surrounding I/O.
    pub fn set_error(&mut self, error: Option<String>) {
        let mut next = self.draft();
        next.error = error;
        self.commit("set_error", next);
    }

    /// Loads the demo users, project, board and tasks, replacing those
    /// collections. The current user is kept.
    pub fn initialize_demo_data(&mut self) {
        let mut next = self.draft();
        next.users = demo::users();
        demo::seed(&mut next);
        self.commit("initialize_demo_data", next);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn draft(&self) -> AppState {
        AppState::clone(&self.state)
    }

    fn commit(&mut self, op: &'static str, next: AppState) {
        self.state = Arc::new(next);
        self.version += 1;
        tracing::debug!(op, version = self.version, "state committed");
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}
