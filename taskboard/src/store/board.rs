//! Column membership maintenance and the rendered board projection.
//!
//! Board columns only hold task ids. These helpers keep those id lists in
//! line with task statuses, and [`project`] resolves them against the flat
//! task collection for rendering.

use std::collections::{HashMap, HashSet};

use taskboard_model::{Board, Column, Status, Task, TaskId};

/// A column resolved against the flat task list, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView<'a> {
    pub column: &'a Column,
    /// Member tasks, in column order.
    pub tasks: Vec<&'a Task>,
}

/// Puts `task_id` into the column for `status`, removing it from any other.
///
/// With `index`, the task lands at that position (clamped to the column
/// length). Without it, a task already in the destination column keeps its
/// place and anything else is appended. Returns `false` if the board has no
/// column for `status`, in which case the task ends up on no column.
pub fn place(board: &mut Board, task_id: &TaskId, status: Status, index: Option<usize>) -> bool {
    if index.is_none()
        && board
            .column(status)
            .is_some_and(|column| column.contains(task_id))
    {
        return true;
    }

    remove(board, task_id);
    let Some(column) = board.column_mut(status) else {
        return false;
    };
    let at = index.map_or(column.task_ids.len(), |i| i.min(column.task_ids.len()));
    column.task_ids.insert(at, task_id.clone());
    true
}

/// Removes `task_id` from every column.
pub fn remove(board: &mut Board, task_id: &TaskId) {
    for column in &mut board.columns {
        column.task_ids.retain(|id| id != task_id);
    }
}

/// Brings a board supplied from outside in line with `tasks`.
///
/// Unknown ids and duplicates are dropped. An id sitting in a column whose
/// status differs from the task's is moved to the end of the matching
/// column, or dropped if there is none. Tasks missing from the board are
/// not added.
pub fn reconcile(board: &mut Board, tasks: &[Task]) {
    let statuses: HashMap<&TaskId, Status> = tasks.iter().map(|t| (&t.id, t.status)).collect();
    let mut seen: HashSet<TaskId> = HashSet::new();
    let mut misplaced: Vec<(TaskId, Status)> = Vec::new();

    for column in &mut board.columns {
        let column_status = column.status;
        column.task_ids.retain(|id| {
            let Some(&status) = statuses.get(id) else {
                return false;
            };
            if !seen.insert(id.clone()) {
                return false;
            }
            if status != column_status {
                misplaced.push((id.clone(), status));
                return false;
            }
            true
        });
    }

    for (id, status) in misplaced {
        if let Some(column) = board.column_mut(status) {
            column.task_ids.push(id);
        }
    }
}

/// Appends every task not yet on the board to the column for its status,
/// in flat-list order.
pub fn populate(board: &mut Board, tasks: &[Task]) {
    for task in tasks {
        if board.column_of(&task.id).is_none()
            && let Some(column) = board.column_mut(task.status)
        {
            column.task_ids.push(task.id.clone());
        }
    }
}

/// Resolves the board's columns against `tasks`, sorted by column order.
///
/// Ids with no matching task are skipped.
#[must_use]
pub fn project<'a>(board: &'a Board, tasks: &'a [Task]) -> Vec<ColumnView<'a>> {
    let by_id: HashMap<&TaskId, &Task> = tasks.iter().map(|t| (&t.id, t)).collect();
    board
        .ordered_columns()
        .into_iter()
        .map(|column| ColumnView {
            column,
            tasks: column
                .task_ids
                .iter()
                .filter_map(|id| by_id.get(id).copied())
                .collect(),
        })
        .collect()
}
