//! Draft version model and restore outcome.

use inkwell_core::types::{DbId, Timestamp, VersionNumber};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::draft::Draft;

/// A row from the `draft_versions` table. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DraftVersion {
    pub id: DbId,
    pub draft_id: DbId,
    pub version_number: VersionNumber,
    pub content: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for checkpointing a draft.
///
/// With `content` set the snapshot also becomes the live content. Without
/// it the live content is snapshotted as it stands under the draft lock.
#[derive(Debug, Clone)]
pub struct CreateVersion {
    pub draft_id: DbId,
    pub content: Option<String>,
    pub created_by: Option<DbId>,
}

/// Result of a committed restore.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreOutcome {
    /// The draft with its live content reset to the target snapshot.
    pub draft: Draft,
    pub target_version_number: VersionNumber,
    pub deleted_count: i64,
}
