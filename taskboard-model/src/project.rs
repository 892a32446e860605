//! Projects group members and tasks under a shared name and color.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ProjectId, UserId};
use crate::task::Task;
use crate::user::User;

/// A project. Members and tasks are embedded snapshots, not references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    /// Display color as a CSS hex string.
    pub color: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates an empty project owned by `owner`.
    #[must_use]
    pub fn new(id: impl Into<ProjectId>, name: &str, owner: impl Into<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.to_string(),
            description: None,
            color: "#0ea5e9".to_string(),
            owner_id: owner.into(),
            members: Vec::new(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a [`Project`]. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
    pub owner_id: Option<UserId>,
    pub members: Option<Vec<User>>,
    pub tasks: Option<Vec<Task>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectPatch {
    /// Patch that only renames the project.
    #[must_use]
    pub fn rename(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Merges the set fields into `project`.
    pub fn apply(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            project.description.clone_from(description);
        }
        if let Some(color) = &self.color {
            project.color.clone_from(color);
        }
        if let Some(owner) = &self.owner_id {
            project.owner_id = owner.clone();
        }
        if let Some(members) = &self.members {
            project.members.clone_from(members);
        }
        if let Some(tasks) = &self.tasks {
            project.tasks.clone_from(tasks);
        }
        if let Some(updated_at) = self.updated_at {
            project.updated_at = updated_at;
        }
    }
}
