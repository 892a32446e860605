//! Boards and their status columns.
//!
//! A column records which tasks it holds, in display order, by id. The
//! tasks themselves live once in the flat task collection; rendering code
//! resolves ids against that collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{BoardId, ColumnId, ProjectId, TaskId};
use crate::task::Status;

/// One status bucket on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// The status every task in this column carries.
    pub status: Status,
    pub color: String,
    /// Left-to-right position. Unique within a board.
    pub order: i32,
    /// Member tasks, top to bottom.
    #[serde(default)]
    pub task_ids: Vec<TaskId>,
}

impl Column {
    /// Creates an empty column using the status' default title and color.
    #[must_use]
    pub fn for_status(id: impl Into<ColumnId>, status: Status, order: i32) -> Self {
        Self {
            id: id.into(),
            title: status.title().to_string(),
            status,
            color: status.color().to_string(),
            order,
            task_ids: Vec::new(),
        }
    }

    /// Returns `true` if the column holds `task_id`.
    #[must_use]
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id)
    }
}

/// A Kanban board for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub project_id: ProjectId,
    pub columns: Vec<Column>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates a board with one empty column per [`Status`], in workflow
    /// order. Column ids are `"1"` through `"4"`.
    #[must_use]
    pub fn standard(
        id: impl Into<BoardId>,
        name: &str,
        project_id: impl Into<ProjectId>,
        now: DateTime<Utc>,
    ) -> Self {
        let columns = Status::ALL
            .iter()
            .zip(1..)
            .map(|(status, n)| Column::for_status(n.to_string(), *status, n - 1))
            .collect();
        Self {
            id: id.into(),
            name: name.to_string(),
            project_id: project_id.into(),
            columns,
            created_at: now,
            updated_at: now,
        }
    }

    /// The column representing `status`, if the board has one.
    #[must_use]
    pub fn column(&self, status: Status) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// Mutable access to the column representing `status`.
    pub fn column_mut(&mut self, status: Status) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.status == status)
    }

    /// The column currently holding `task_id`.
    #[must_use]
    pub fn column_of(&self, task_id: &TaskId) -> Option<&Column> {
        self.columns.iter().find(|c| c.contains(task_id))
    }

    /// Columns sorted by their `order` field.
    #[must_use]
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order);
        columns
    }
}
