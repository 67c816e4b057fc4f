//! Handlers for the `/drafts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::access::AccessLevel;
use inkwell_core::types::DbId;
use inkwell_db::models::draft::{Draft, UpdateDraft};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireProfile;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /drafts`.
#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    pub title: String,
}

/// The caller's effective access to one draft.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub draft_id: DbId,
    pub access: AccessLevel,
}

/// GET /api/v1/drafts
pub async fn list_owned(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Draft>>>> {
    let drafts = state.workflow.drafts.list_owned(user.user_id()).await?;
    Ok(Json(DataResponse { data: drafts }))
}

/// GET /api/v1/drafts/shared
pub async fn list_shared(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Draft>>>> {
    let drafts = state.workflow.drafts.list_shared(user.user_id()).await?;
    Ok(Json(DataResponse { data: drafts }))
}

/// POST /api/v1/drafts
pub async fn create(
    State(state): State<AppState>,
    RequireProfile(user): RequireProfile,
    Json(input): Json<CreateDraftRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Draft>>)> {
    let draft = state
        .workflow
        .drafts
        .create_draft(&user.identity, &input.title)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: draft })))
}

/// GET /api/v1/drafts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Draft>>> {
    let draft = state.workflow.drafts.get_draft(id, user.user_id()).await?;
    Ok(Json(DataResponse { data: draft }))
}

/// PATCH /api/v1/drafts/{id}
///
/// Title and live-content updates; the persistence path of real-time edits.
pub async fn update(
    State(state): State<AppState>,
    RequireProfile(user): RequireProfile,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDraft>,
) -> AppResult<Json<DataResponse<Draft>>> {
    let draft = state
        .workflow
        .drafts
        .update_draft(id, &user.identity, input)
        .await?;
    Ok(Json(DataResponse { data: draft }))
}

/// GET /api/v1/drafts/{id}/access
///
/// Missing and inaccessible drafts both answer `none`.
pub async fn get_access(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AccessResponse>>> {
    let access = state
        .workflow
        .access
        .effective_access(id, user.user_id())
        .await?;
    Ok(Json(DataResponse {
        data: AccessResponse {
            draft_id: id,
            access,
        },
    }))
}
