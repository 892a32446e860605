//! Users and their descriptive roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseEnumError;
use crate::id::UserId;

/// A user's role. Informational only; nothing in the store enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Workspace administrator.
    Admin,
    /// Project manager.
    Manager,
    /// Regular team member.
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "member" => Ok(Self::Member),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
                expected: "admin, manager, member",
            }),
        }
    }
}

/// A person who can own projects, create tasks and be assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Avatar image URL.
    pub avatar: Option<String>,
    pub role: Role,
}

impl User {
    /// Creates a user without an avatar.
    #[must_use]
    pub fn new(id: impl Into<UserId>, name: &str, email: &str, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: None,
            role,
        }
    }
}

/// Partial update for a [`User`]. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the avatar.
    pub avatar: Option<Option<String>>,
    pub role: Option<Role>,
}

impl UserPatch {
    /// Merges the set fields into `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(avatar) = &self.avatar {
            user.avatar.clone_from(avatar);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}
