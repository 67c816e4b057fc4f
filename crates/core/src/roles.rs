//! User roles.
//!
//! Stored as lowercase text in `users.role`; the string forms must match the
//! `ck_users_role` check constraint in the initial migration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_AUTHOR: &str = "author";
pub const ROLE_REVIEWER: &str = "reviewer";
pub const ROLE_UNASSIGNED: &str = "unassigned";

/// The closed set of roles a user can hold.
///
/// A freshly registered account is [`Role::Unassigned`] until it completes
/// profile setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates drafts, edits them, and submits them for review.
    Author,
    /// Approves or rejects submissions.
    Reviewer,
    /// Registered but has not picked a role yet.
    Unassigned,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => ROLE_AUTHOR,
            Role::Reviewer => ROLE_REVIEWER,
            Role::Unassigned => ROLE_UNASSIGNED,
        }
    }

    /// Whether the role has been chosen during onboarding.
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Role::Unassigned)
    }

    pub fn can_author(&self) -> bool {
        matches!(self, Role::Author)
    }

    pub fn can_review(&self) -> bool {
        matches!(self, Role::Reviewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_AUTHOR => Ok(Role::Author),
            ROLE_REVIEWER => Ok(Role::Reviewer),
            ROLE_UNASSIGNED => Ok(Role::Unassigned),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {ROLE_AUTHOR}, {ROLE_REVIEWER}, {ROLE_UNASSIGNED}"
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validate a role chosen during profile setup. `unassigned` is not a choice.
pub fn validate_selectable_role(role: Role) -> Result<(), CoreError> {
    if role.is_assigned() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Role must be either 'author' or 'reviewer'".to_string(),
        ))
    }
}
