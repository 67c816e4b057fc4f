//! Repository for the `draft_submissions` table.

use inkwell_core::error::CoreError;
use inkwell_core::roles::Role;
use inkwell_core::submission::SubmissionStatus;
use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::submission::{
    CreateSubmission, DecideSubmission, PendingSubmission, ReviewStats, Submission,
};
use crate::models::version::DraftVersion;
use crate::repositories::{DraftRepo, VersionRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, draft_id, version_id, submitted_by, status, feedback, \
                       reviewed_by, submitted_at, reviewed_at";

/// Provides the submission lifecycle and review-queue queries.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Open a pending submission anchored to a version.
    ///
    /// Without an explicit `version_id` the draft's live content is
    /// checkpointed first. Everything happens under the draft's row lock; the
    /// `uq_draft_submissions_one_pending` index backs the pending check.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmission,
    ) -> StoreResult<(Submission, Option<DraftVersion>)> {
        let mut tx = pool.begin().await?;

        let draft = DraftRepo::lock_for_update(&mut *tx, input.draft_id)
            .await?
            .ok_or_else(|| CoreError::draft_not_found(input.draft_id))?;

        let pending: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM draft_submissions \
             WHERE draft_id = $1 AND status = 'pending')",
        )
        .bind(draft.id)
        .fetch_one(&mut *tx)
        .await?;
        if pending.0 {
            return Err(CoreError::Conflict(
                "This draft already has a submission awaiting review".to_string(),
            )
            .into());
        }

        let (version_id, created) = match input.version_id {
            Some(version_id) => {
                let belongs: (bool,) = sqlx::query_as(
                    "SELECT EXISTS (SELECT 1 FROM draft_versions WHERE id = $1 AND draft_id = $2)",
                )
                .bind(version_id)
                .bind(draft.id)
                .fetch_one(&mut *tx)
                .await?;
                if !belongs.0 {
                    return Err(CoreError::NotFound {
                        entity: "DraftVersion",
                        id: version_id,
                    }
                    .into());
                }
                (version_id, None)
            }
            None => {
                let version = VersionRepo::insert_next(
                    &mut *tx,
                    draft.id,
                    &draft.content,
                    Some(input.submitted_by),
                )
                .await?;
                (version.id, Some(version))
            }
        };

        let query = format!(
            "INSERT INTO draft_submissions (draft_id, version_id, submitted_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let submission = sqlx::query_as::<_, Submission>(&query)
            .bind(draft.id)
            .bind(version_id)
            .bind(input.submitted_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((submission, created))
    }

    /// Find a submission by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM draft_submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Submission history for a draft, newest first.
    pub async fn list_for_draft(
        pool: &PgPool,
        draft_id: DbId,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM draft_submissions \
             WHERE draft_id = $1 ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(draft_id)
            .fetch_all(pool)
            .await
    }

    /// The review queue, newest first, joined with draft and submitter details.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<PendingSubmission>, sqlx::Error> {
        sqlx::query_as::<_, PendingSubmission>(
            "SELECT s.id, s.draft_id, d.title AS draft_title, s.version_id, \
                    v.version_number, s.submitted_by, \
                    COALESCE(u.display_name, u.email) AS submitter_name, s.submitted_at \
             FROM draft_submissions s \
             JOIN drafts d ON d.id = s.draft_id \
             LEFT JOIN draft_versions v ON v.id = s.version_id \
             LEFT JOIN users u ON u.id = s.submitted_by \
             WHERE s.status = 'pending' \
             ORDER BY s.submitted_at DESC, s.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Apply a decision only if the submission is still pending.
    ///
    /// Returns `None` when the row is missing or already resolved.
    pub async fn decide(
        pool: &PgPool,
        input: &DecideSubmission,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE draft_submissions SET
                status = $2,
                feedback = $3,
                reviewed_by = $4,
                reviewed_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.submission_id)
            .bind(input.status.as_str())
            .bind(&input.feedback)
            .bind(input.reviewer_id)
            .fetch_optional(pool)
            .await
    }

    /// Reviewer dashboard counters.
    pub async fn stats(pool: &PgPool) -> Result<ReviewStats, sqlx::Error> {
        sqlx::query_as::<_, ReviewStats>(
            "SELECT \
                (SELECT COUNT(*) FROM users WHERE role = $1) AS author_count, \
                (SELECT COUNT(*) FROM draft_submissions WHERE status = $2) AS pending_submissions, \
                (SELECT COUNT(*) FROM draft_submissions WHERE status = $3) AS approved_submissions",
        )
        .bind(Role::Author.as_str())
        .bind(SubmissionStatus::Pending.as_str())
        .bind(SubmissionStatus::Approved.as_str())
        .fetch_one(pool)
        .await
    }
}
