//! Opaque string identifiers.
//!
//! Every entity collection is keyed by its own newtype. Ids coming from
//! persisted records or the demo dataset are arbitrary strings (`"1"`,
//! `"2"`, ...); ids minted locally are UUID v7 strings so they sort by
//! creation time.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mints a fresh, time-ordered identifier (UUID v7).
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifies a [`User`](crate::User).
    UserId
);
string_id!(
    /// Identifies a [`Task`](crate::Task).
    TaskId
);
string_id!(
    /// Identifies a [`Comment`](crate::Comment) on a task.
    CommentId
);
string_id!(
    /// Identifies an [`Attachment`](crate::Attachment) on a task.
    AttachmentId
);
string_id!(
    /// Identifies a [`Project`](crate::Project).
    ProjectId
);
string_id!(
    /// Identifies a [`Board`](crate::Board).
    BoardId
);
string_id!(
    /// Identifies a [`Column`](crate::Column) within a board.
    ColumnId
);
