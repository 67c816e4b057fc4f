//! Draft entity model and DTOs.

use inkwell_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `drafts` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Draft {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    /// Current live content, continuously rewritten by real-time edits.
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new, empty draft.
#[derive(Debug, Clone)]
pub struct CreateDraft {
    pub owner_id: DbId,
    pub title: String,
}

/// DTO for updating a draft. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDraft {
    pub title: Option<String>,
    pub content: Option<String>,
}
