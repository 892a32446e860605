//! Filter criteria for task lists.
//!
//! The store only records the active filters; applying them is up to the
//! consuming view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::UserId;
use crate::task::{Priority, Status, Task};

/// Optional constraints on a task list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilters {
    pub status: Option<Vec<Status>>,
    pub priority: Option<Vec<Priority>>,
    pub assignee_id: Option<Vec<UserId>>,
    /// A task matches when it carries at least one of these tags.
    pub tags: Option<Vec<String>>,
    /// Case-insensitive substring matched against title, description and tags.
    pub search: Option<String>,
    pub due_date_from: Option<DateTime<Utc>>,
    pub due_date_to: Option<DateTime<Utc>>,
}

impl TaskFilters {
    /// Returns `true` when no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites every criterion that is set in `patch`.
    pub fn merge(&mut self, patch: Self) {
        if patch.status.is_some() {
            self.status = patch.status;
        }
        if patch.priority.is_some() {
            self.priority = patch.priority;
        }
        if patch.assignee_id.is_some() {
            self.assignee_id = patch.assignee_id;
        }
        if patch.tags.is_some() {
            self.tags = patch.tags;
        }
        if patch.search.is_some() {
            self.search = patch.search;
        }
        if patch.due_date_from.is_some() {
            self.due_date_from = patch.due_date_from;
        }
        if patch.due_date_to.is_some() {
            self.due_date_to = patch.due_date_to;
        }
    }

    /// Evaluates every set criterion against `task`.
    ///
    /// An empty set list (`Some(vec![])`) is treated like an unset one. A
    /// due-date bound excludes tasks without a due date. Both bounds are
    /// inclusive.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(statuses) = non_empty(self.status.as_deref())
            && !statuses.contains(&task.status)
        {
            return false;
        }
        if let Some(priorities) = non_empty(self.priority.as_deref())
            && !priorities.contains(&task.priority)
        {
            return false;
        }
        if let Some(assignees) = non_empty(self.assignee_id.as_deref())
            && !task.assignee_id.as_ref().is_some_and(|a| assignees.contains(a))
        {
            return false;
        }
        if let Some(tags) = non_empty(self.tags.as_deref())
            && !tags.iter().any(|t| task.tags.contains(t))
        {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
            && !matches_search(task, &search.to_lowercase())
        {
            return false;
        }
        if self.due_date_from.is_some() || self.due_date_to.is_some() {
            let Some(due) = task.due_date else {
                return false;
            };
            if self.due_date_from.is_some_and(|from| due < from)
                || self.due_date_to.is_some_and(|to| due > to)
            {
                return false;
            }
        }
        true
    }
}

fn non_empty<T>(values: Option<&[T]>) -> Option<&[T]> {
    values.filter(|v| !v.is_empty())
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || task.tags.iter().any(|t| t.to_lowercase().contains(needle))
}
