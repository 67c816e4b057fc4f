//! Collaborator grant model and DTOs.

use inkwell_core::roles::Role;
use inkwell_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `draft_collaborators` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Collaborator {
    pub id: DbId,
    pub draft_id: DbId,
    pub user_id: DbId,
    pub added_by: DbId,
    pub created_at: Timestamp,
}

/// A grant joined with the collaborator's profile, for listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollaboratorWithUser {
    pub id: DbId,
    pub draft_id: DbId,
    pub user_id: DbId,
    pub added_by: DbId,
    pub created_at: Timestamp,
    pub email: String,
    pub display_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

/// DTO for granting edit access.
#[derive(Debug, Clone)]
pub struct CreateCollaborator {
    pub draft_id: DbId,
    pub user_id: DbId,
    pub added_by: DbId,
}
