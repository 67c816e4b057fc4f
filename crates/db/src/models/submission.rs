//! Draft submission model, DTOs and review-queue projections.

use inkwell_core::submission::SubmissionStatus;
use inkwell_core::types::{DbId, Timestamp, VersionNumber};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `draft_submissions` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub draft_id: DbId,
    /// Anchored snapshot. `None` only if a later restore removed the version
    /// after this submission was resolved.
    pub version_id: Option<DbId>,
    pub submitted_by: DbId,
    #[sqlx(try_from = "String")]
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub submitted_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
}

/// DTO for opening a submission.
///
/// When `version_id` is `None` the store checkpoints the draft's live content
/// first, in the same transaction.
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub draft_id: DbId,
    pub submitted_by: DbId,
    pub version_id: Option<DbId>,
}

/// DTO for a reviewer decision. Applied only if the row is still `pending`.
#[derive(Debug, Clone)]
pub struct DecideSubmission {
    pub submission_id: DbId,
    pub reviewer_id: DbId,
    pub status: SubmissionStatus,
    pub feedback: String,
}

/// A pending submission enriched for the review queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingSubmission {
    pub id: DbId,
    pub draft_id: DbId,
    pub draft_title: String,
    pub version_id: Option<DbId>,
    pub version_number: Option<VersionNumber>,
    pub submitted_by: DbId,
    pub submitter_name: Option<String>,
    pub submitted_at: Timestamp,
}

/// Counters for the reviewer dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow, Serialize)]
pub struct ReviewStats {
    pub author_count: i64,
    pub pending_submissions: i64,
    pub approved_submissions: i64,
}
