//! Pure read-side derivations over store snapshots.
//!
//! Nothing here mutates state; dashboards and lists call these on the
//! current [`AppState`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use taskboard_model::{AppState, Priority, Status, Task, TaskFilters, UserId};

/// Default number of entries in the "recent tasks" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Tasks matching `filters`, in collection order.
#[must_use]
pub fn filter_tasks<'a>(tasks: &'a [Task], filters: &TaskFilters) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filters.matches(t)).collect()
}

/// The state's tasks with its active filters applied.
#[must_use]
pub fn visible_tasks(state: &AppState) -> Vec<&Task> {
    filter_tasks(&state.tasks, &state.filters)
}

/// Groups tasks by status. Every status has an entry, possibly empty.
#[must_use]
pub fn group_by_status<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
) -> BTreeMap<Status, Vec<&'a Task>> {
    let mut groups: BTreeMap<Status, Vec<&Task>> =
        Status::ALL.iter().map(|s| (*s, Vec::new())).collect();
    for task in tasks {
        groups.entry(task.status).or_default().push(task);
    }
    groups
}

/// Tasks assigned to `user`, most recently updated first, at most `limit`.
#[must_use]
pub fn recent_tasks_for<'a>(tasks: &'a [Task], user: &UserId, limit: usize) -> Vec<&'a Task> {
    let mut mine: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.assignee_id.as_ref() == Some(user))
        .collect();
    mine.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    mine.truncate(limit);
    mine
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    /// Assigned to the current user.
    pub mine: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
    /// Urgent and not done.
    pub urgent_open: usize,
    /// Past due and not done.
    pub overdue: usize,
    /// Members of the current project.
    pub members: usize,
    /// Share of done tasks, rounded to the nearest percent.
    pub completion_percent: usize,
}

/// Computes [`DashboardStats`] over all tasks in `state`.
#[must_use]
pub fn dashboard_stats(state: &AppState, now: DateTime<Utc>) -> DashboardStats {
    let me = state.current_user.as_ref().map(|u| &u.id);
    let mut stats = DashboardStats {
        total: state.tasks.len(),
        members: state.current_project.as_ref().map_or(0, |p| p.members.len()),
        ..DashboardStats::default()
    };

    for task in &state.tasks {
        match task.status {
            Status::Todo => stats.todo += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Review => stats.review += 1,
            Status::Done => stats.done += 1,
        }
        if me.is_some() && task.assignee_id.as_ref() == me {
            stats.mine += 1;
        }
        if task.priority == Priority::Urgent && task.status != Status::Done {
            stats.urgent_open += 1;
        }
        if task.is_overdue(now) {
            stats.overdue += 1;
        }
    }

    if stats.total > 0 {
        stats.completion_percent = (stats.done * 200 + stats.total) / (stats.total * 2);
    }
    stats
}
