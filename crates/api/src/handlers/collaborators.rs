//! Handlers for `/drafts/{id}/collaborators`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::types::DbId;
use inkwell_db::models::collaborator::{Collaborator, CollaboratorWithUser};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireProfile;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /drafts/{id}/collaborators`.
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub user_id: DbId,
}

/// GET /api/v1/drafts/{id}/collaborators
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(draft_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CollaboratorWithUser>>>> {
    let collaborators = state
        .workflow
        .access
        .list_collaborators(draft_id, user.user_id())
        .await?;
    Ok(Json(DataResponse {
        data: collaborators,
    }))
}

/// POST /api/v1/drafts/{id}/collaborators
pub async fn grant(
    State(state): State<AppState>,
    RequireProfile(user): RequireProfile,
    Path(draft_id): Path<DbId>,
    Json(input): Json<GrantRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Collaborator>>)> {
    let collaborator = state
        .workflow
        .access
        .grant(draft_id, &user.identity, input.user_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: collaborator }),
    ))
}

/// DELETE /api/v1/drafts/{id}/collaborators/{grant_id}
pub async fn revoke(
    State(state): State<AppState>,
    RequireProfile(user): RequireProfile,
    Path((draft_id, grant_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    state
        .workflow
        .access
        .revoke(draft_id, &user.identity, grant_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
