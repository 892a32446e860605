//! Data model shared by every `Taskboard` consumer.
//!
//! Entities are plain serde types. Identifiers are opaque strings wrapped in
//! newtypes so a `TaskId` cannot be passed where a `UserId` is expected.

pub mod board;
pub mod codec;
pub mod filters;
pub mod id;
pub mod project;
pub mod state;
pub mod task;
pub mod user;

pub use board::{Board, Column};
pub use codec::{CodecError, Format};
pub use filters::TaskFilters;
pub use id::{AttachmentId, BoardId, ColumnId, CommentId, ProjectId, TaskId, UserId};
pub use project::{Project, ProjectPatch};
pub use state::{AppState, PersistedState};
pub use task::{Attachment, Comment, Priority, Status, Task, TaskPatch};
pub use user::{Role, User, UserPatch};

/// Error returned when parsing one of the model's enums from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?} (expected one of: {expected})")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma-separated list of accepted spellings.
    pub expected: &'static str,
}
