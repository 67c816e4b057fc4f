//! Repository for the `draft_versions` table.
//!
//! Version numbers are allocated as `MAX + 1` while holding the parent draft's
//! row lock, so two concurrent checkpoints of the same draft serialize and
//! never read the same maximum.

use inkwell_core::error::CoreError;
use inkwell_core::types::{DbId, VersionNumber};
use inkwell_core::versioning::{check_confirmation, plan_restore};
use sqlx::{PgConnection, PgPool};

use crate::error::StoreResult;
use crate::models::version::{CreateVersion, DraftVersion, RestoreOutcome};
use crate::repositories::DraftRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, draft_id, version_number, content, created_by, created_at";

/// Provides checkpoint, history and restore operations for draft versions.
pub struct VersionRepo;

impl VersionRepo {
    /// Insert the next-numbered version inside an existing transaction.
    ///
    /// The caller must already hold the draft's row lock.
    pub(crate) async fn insert_next(
        conn: &mut PgConnection,
        draft_id: DbId,
        content: &str,
        created_by: Option<DbId>,
    ) -> Result<DraftVersion, sqlx::Error> {
        let next: (VersionNumber,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1 \
             FROM draft_versions WHERE draft_id = $1",
        )
        .bind(draft_id)
        .fetch_one(&mut *conn)
        .await?;

        let query = format!(
            "INSERT INTO draft_versions (draft_id, version_number, content, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DraftVersion>(&query)
            .bind(draft_id)
            .bind(next.0)
            .bind(content)
            .bind(created_by)
            .fetch_one(&mut *conn)
            .await
    }

    /// Checkpoint a draft. Explicit content also becomes the live content;
    /// otherwise the locked row's live content is snapshotted untouched.
    pub async fn create_next(pool: &PgPool, input: &CreateVersion) -> StoreResult<DraftVersion> {
        let mut tx = pool.begin().await?;

        let draft = DraftRepo::lock_for_update(&mut *tx, input.draft_id)
            .await?
            .ok_or_else(|| CoreError::draft_not_found(input.draft_id))?;

        let version = match &input.content {
            Some(content) => {
                let version =
                    Self::insert_next(&mut *tx, input.draft_id, content, input.created_by).await?;
                DraftRepo::set_content(&mut *tx, input.draft_id, content).await?;
                version
            }
            None => {
                Self::insert_next(&mut *tx, input.draft_id, &draft.content, input.created_by)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(version)
    }

    /// All versions of a draft, newest first.
    pub async fn list_for_draft(
        pool: &PgPool,
        draft_id: DbId,
    ) -> Result<Vec<DraftVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM draft_versions \
             WHERE draft_id = $1 ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, DraftVersion>(&query)
            .bind(draft_id)
            .fetch_all(pool)
            .await
    }

    /// Find a version by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DraftVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM draft_versions WHERE id = $1");
        sqlx::query_as::<_, DraftVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a version by its per-draft number.
    pub async fn find_by_number(
        pool: &PgPool,
        draft_id: DbId,
        version_number: VersionNumber,
    ) -> Result<Option<DraftVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM draft_versions WHERE draft_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, DraftVersion>(&query)
            .bind(draft_id)
            .bind(version_number)
            .fetch_optional(pool)
            .await
    }

    /// Highest existing version number, or `None` if the draft has none.
    pub async fn latest_number(
        pool: &PgPool,
        draft_id: DbId,
    ) -> Result<Option<VersionNumber>, sqlx::Error> {
        let row: (Option<VersionNumber>,) =
            sqlx::query_as("SELECT MAX(version_number) FROM draft_versions WHERE draft_id = $1")
                .bind(draft_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Every existing version number of a draft, ascending.
    pub async fn numbers_for_draft<'c, E>(
        executor: E,
        draft_id: DbId,
    ) -> Result<Vec<VersionNumber>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'c>,
    {
        sqlx::query_scalar(
            "SELECT version_number FROM draft_versions \
             WHERE draft_id = $1 ORDER BY version_number ASC",
        )
        .bind(draft_id)
        .fetch_all(executor)
        .await
    }

    /// Reset a draft to version `target` and delete every newer version.
    ///
    /// Runs under the draft's row lock so the plan cannot go stale between
    /// computing it and deleting. Resolved submissions anchored to a deleted
    /// version keep their row with `version_id` cleared by the foreign key.
    pub async fn restore(
        pool: &PgPool,
        draft_id: DbId,
        target: VersionNumber,
        expected_deleted_count: Option<i64>,
    ) -> StoreResult<RestoreOutcome> {
        let mut tx = pool.begin().await?;

        if DraftRepo::lock_for_update(&mut *tx, draft_id)
            .await?
            .is_none()
        {
            return Err(CoreError::draft_not_found(draft_id).into());
        }

        let existing = Self::numbers_for_draft(&mut *tx, draft_id).await?;
        let plan = plan_restore(draft_id, &existing, target)?;
        check_confirmation(&plan, expected_deleted_count)?;

        let anchored: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM draft_submissions s \
             JOIN draft_versions v ON v.id = s.version_id \
             WHERE s.draft_id = $1 AND s.status = 'pending' AND v.version_number > $2",
        )
        .bind(draft_id)
        .bind(target)
        .fetch_one(&mut *tx)
        .await?;
        if anchored.0 > 0 {
            return Err(CoreError::Conflict(format!(
                "A pending submission references a version newer than {target}; \
                 it must be reviewed before restoring"
            ))
            .into());
        }

        let content: (String,) = sqlx::query_as(
            "SELECT content FROM draft_versions WHERE draft_id = $1 AND version_number = $2",
        )
        .bind(draft_id)
        .bind(target)
        .fetch_one(&mut *tx)
        .await?;

        let draft = DraftRepo::set_content(&mut *tx, draft_id, &content.0).await?;

        let deleted =
            sqlx::query("DELETE FROM draft_versions WHERE draft_id = $1 AND version_number > $2")
                .bind(draft_id)
                .bind(target)
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(RestoreOutcome {
            draft,
            target_version_number: plan.target_version_number,
            deleted_count: deleted.rows_affected() as i64,
        })
    }
}
