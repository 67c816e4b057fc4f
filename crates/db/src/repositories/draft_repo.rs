//! Repository for the `drafts` table.

use inkwell_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::draft::{CreateDraft, Draft, UpdateDraft};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, owner_id, title, content, created_at, updated_at";

/// Provides CRUD operations for drafts.
pub struct DraftRepo;

impl DraftRepo {
    /// Insert a new draft with empty content.
    pub async fn create(pool: &PgPool, input: &CreateDraft) -> Result<Draft, sqlx::Error> {
        let query =
            format!("INSERT INTO drafts (owner_id, title) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Draft>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }

    /// Find a draft by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Draft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drafts WHERE id = $1");
        sqlx::query_as::<_, Draft>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a draft row for the rest of the enclosing transaction.
    ///
    /// Every operation that allocates version numbers, deletes versions, or
    /// opens a submission takes this lock first, which serializes them per
    /// draft.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Draft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drafts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Draft>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Update a draft. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDraft,
    ) -> Result<Option<Draft>, sqlx::Error> {
        let query = format!(
            "UPDATE drafts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite live content inside an existing transaction.
    pub async fn set_content(
        conn: &mut PgConnection,
        id: DbId,
        content: &str,
    ) -> Result<Draft, sqlx::Error> {
        let query = format!(
            "UPDATE drafts SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(id)
            .bind(content)
            .fetch_one(conn)
            .await
    }

    /// List drafts owned by a user, most recently updated first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Draft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drafts WHERE owner_id = $1 ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List drafts on which a user holds a collaborator grant.
    pub async fn list_shared_with(pool: &PgPool, user_id: DbId) -> Result<Vec<Draft>, sqlx::Error> {
        let query = "SELECT d.id, d.owner_id, d.title, d.content, d.created_at, d.updated_at
             FROM drafts d
             JOIN draft_collaborators c ON c.draft_id = d.id
             WHERE c.user_id = $1
             ORDER BY d.updated_at DESC, d.id DESC";
        sqlx::query_as::<_, Draft>(query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
