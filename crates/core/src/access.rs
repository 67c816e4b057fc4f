//! Effective access evaluation for drafts.
//!
//! Effective edit permission for a draft is the owner plus the set of users
//! holding an explicit collaborator grant. Owner status always wins, even if a
//! stray grant row exists for the owner.
//!
//! Callers with no access get `NotFound` rather than `Forbidden` so that the
//! existence of drafts they cannot see is never revealed. Callers who can see
//! the draft but lack owner rights get `Forbidden`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// What a user may do with a particular draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    None,
    Collaborator,
    Owner,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::Collaborator => "collaborator",
            AccessLevel::Owner => "owner",
        }
    }

    /// Owner and collaborators share full edit rights.
    pub fn can_edit(&self) -> bool {
        !matches!(self, AccessLevel::None)
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, AccessLevel::Owner)
    }
}

/// Resolve the effective access level of `user_id` on a draft owned by
/// `owner_id`, given whether an explicit grant row exists.
pub fn evaluate(owner_id: DbId, user_id: DbId, has_grant: bool) -> AccessLevel {
    if owner_id == user_id {
        AccessLevel::Owner
    } else if has_grant {
        AccessLevel::Collaborator
    } else {
        AccessLevel::None
    }
}

/// Require that the caller can at least see (and therefore edit) the draft.
pub fn require_edit(level: AccessLevel, draft_id: DbId) -> Result<(), CoreError> {
    if level.can_edit() {
        Ok(())
    } else {
        Err(CoreError::draft_not_found(draft_id))
    }
}

/// Require owner access for an owner-only `action`.
pub fn require_owner(level: AccessLevel, draft_id: DbId, action: &str) -> Result<(), CoreError> {
    match level {
        AccessLevel::Owner => Ok(()),
        AccessLevel::Collaborator => Err(CoreError::Forbidden(format!(
            "Only the draft owner may {action}"
        ))),
        AccessLevel::None => Err(CoreError::draft_not_found(draft_id)),
    }
}

/// Check that `target_user_id` may receive a new collaborator grant.
///
/// The owner is implicitly a collaborator and never gets a grant row; a user
/// who already holds a grant must not get a duplicate.
pub fn validate_grant_target(
    owner_id: DbId,
    target_user_id: DbId,
    already_granted: bool,
) -> Result<(), CoreError> {
    if owner_id == target_user_id {
        return Err(CoreError::Conflict(
            "The draft owner is already a collaborator".to_string(),
        ));
    }
    if already_granted {
        return Err(CoreError::Conflict(format!(
            "User {target_user_id} is already a collaborator on this draft"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_owner_resolves_to_owner() {
        assert_eq!(evaluate(1, 1, false), AccessLevel::Owner);
    }

    #[test]
    fn test_owner_takes_precedence_over_grant() {
        assert_eq!(evaluate(1, 1, true), AccessLevel::Owner);
    }

    #[test]
    fn test_grant_resolves_to_collaborator() {
        assert_eq!(evaluate(1, 2, true), AccessLevel::Collaborator);
    }

    #[test]
    fn test_stranger_resolves_to_none() {
        assert_eq!(evaluate(1, 3, false), AccessLevel::None);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(AccessLevel::Owner > AccessLevel::Collaborator);
        assert!(AccessLevel::Collaborator > AccessLevel::None);
    }

    #[test]
    fn test_require_edit_hides_existence() {
        assert!(require_edit(AccessLevel::Owner, 5).is_ok());
        assert!(require_edit(AccessLevel::Collaborator, 5).is_ok());
        assert_matches!(
            require_edit(AccessLevel::None, 5),
            Err(CoreError::NotFound {
                entity: "Draft",
                id: 5
            })
        );
    }

    #[test]
    fn test_require_owner() {
        assert!(require_owner(AccessLevel::Owner, 5, "submit").is_ok());
        assert_matches!(
            require_owner(AccessLevel::Collaborator, 5, "submit"),
            Err(CoreError::Forbidden(msg)) if msg.contains("submit")
        );
        assert_matches!(
            require_owner(AccessLevel::None, 5, "submit"),
            Err(CoreError::NotFound { .. })
        );
    }

    #[test]
    fn test_grant_to_owner_conflicts() {
        assert_matches!(
            validate_grant_target(1, 1, false),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_duplicate_grant_conflicts() {
        assert_matches!(
            validate_grant_target(1, 2, true),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_fresh_grant_allowed() {
        assert!(validate_grant_target(1, 2, false).is_ok());
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AccessLevel::Collaborator).unwrap(),
            r#""collaborator""#
        );
    }
}
