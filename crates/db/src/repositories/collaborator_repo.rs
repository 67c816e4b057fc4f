//! Repository for the `draft_collaborators` table.

use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::collaborator::{Collaborator, CollaboratorWithUser, CreateCollaborator};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, draft_id, user_id, added_by, created_at";

/// Provides grant and revoke operations for draft collaborators.
pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// Insert a grant. A duplicate pair violates `uq_draft_collaborators_draft_user`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCollaborator,
    ) -> Result<Collaborator, sqlx::Error> {
        let query = format!(
            "INSERT INTO draft_collaborators (draft_id, user_id, added_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(input.draft_id)
            .bind(input.user_id)
            .bind(input.added_by)
            .fetch_one(pool)
            .await
    }

    /// Whether a grant exists for the pair.
    pub async fn exists(pool: &PgPool, draft_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM draft_collaborators WHERE draft_id = $1 AND user_id = $2)",
        )
        .bind(draft_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Find a grant by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collaborator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM draft_collaborators WHERE id = $1");
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a grant by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM draft_collaborators WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List grants for a draft with each collaborator's profile.
    pub async fn list_for_draft(
        pool: &PgPool,
        draft_id: DbId,
    ) -> Result<Vec<CollaboratorWithUser>, sqlx::Error> {
        sqlx::query_as::<_, CollaboratorWithUser>(
            "SELECT c.id, c.draft_id, c.user_id, c.added_by, c.created_at,
                    u.email, u.display_name, u.role
             FROM draft_collaborators c
             JOIN users u ON u.id = c.user_id
             WHERE c.draft_id = $1
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(draft_id)
        .fetch_all(pool)
        .await
    }
}
