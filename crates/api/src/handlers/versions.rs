//! Handlers for `/drafts/{id}/versions`: checkpoints and restore.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::types::{DbId, VersionNumber};
use inkwell_core::versioning::RestorePlan;
use inkwell_db::models::version::{DraftVersion, RestoreOutcome};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireProfile;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /drafts/{id}/versions`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateVersionRequest {
    /// Snapshot content; defaults to the draft's live content.
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `POST /drafts/{id}/versions/{n}/restore`.
#[derive(Debug, Default, Deserialize)]
pub struct RestoreRequest {
    /// The `deleted_count` the caller confirmed from the preview.
    #[serde(default)]
    pub expected_deleted_count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LatestVersionResponse {
    pub draft_id: DbId,
    pub latest_version_number: Option<VersionNumber>,
}

/// GET /api/v1/drafts/{id}/versions
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(draft_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DraftVersion>>>> {
    let versions = state
        .workflow
        .drafts
        .list_versions(draft_id, user.user_id())
        .await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/drafts/{id}/versions
pub async fn create(
    State(state): State<AppState>,
    RequireProfile(user): RequireProfile,
    Path(draft_id): Path<DbId>,
    input: Option<Json<CreateVersionRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<DraftVersion>>)> {
    let Json(input) = input.unwrap_or_default();
    let version = state
        .workflow
        .drafts
        .create_version(draft_id, &user.identity, input.content)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// GET /api/v1/drafts/{id}/versions/latest
pub async fn latest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(draft_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LatestVersionResponse>>> {
    let latest_version_number = state
        .workflow
        .drafts
        .latest_version_number(draft_id, user.user_id())
        .await?;
    Ok(Json(DataResponse {
        data: LatestVersionResponse {
            draft_id,
            latest_version_number,
        },
    }))
}

/// GET /api/v1/drafts/{id}/versions/{n}
pub async fn get_by_number(
    State(state): State<AppState>,
    user: AuthUser,
    Path((draft_id, number)): Path<(DbId, VersionNumber)>,
) -> AppResult<Json<DataResponse<DraftVersion>>> {
    let version = state
        .workflow
        .drafts
        .get_version(draft_id, number, user.user_id())
        .await?;
    Ok(Json(DataResponse { data: version }))
}

/// GET /api/v1/drafts/{id}/versions/{n}/restore
///
/// The confirmation step: how many versions a restore would delete.
pub async fn preview_restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path((draft_id, number)): Path<(DbId, VersionNumber)>,
) -> AppResult<Json<DataResponse<RestorePlan>>> {
    let plan = state
        .workflow
        .drafts
        .preview_restore(draft_id, number, user.user_id())
        .await?;
    Ok(Json(DataResponse { data: plan }))
}

/// POST /api/v1/drafts/{id}/versions/{n}/restore
pub async fn restore(
    State(state): State<AppState>,
    RequireProfile(user): RequireProfile,
    Path((draft_id, number)): Path<(DbId, VersionNumber)>,
    input: Option<Json<RestoreRequest>>,
) -> AppResult<Json<DataResponse<RestoreOutcome>>> {
    let Json(input) = input.unwrap_or_default();
    let outcome = state
        .workflow
        .drafts
        .restore_version(
            draft_id,
            number,
            &user.identity,
            input.expected_deleted_count,
        )
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}
