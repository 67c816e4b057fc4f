//! Handlers for submissions: submitting drafts and reviewer decisions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::types::DbId;
use inkwell_db::models::submission::{PendingSubmission, Submission};
use inkwell_workflow::{SubmissionDetail, SubmissionReceipt};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireProfile, RequireReviewer};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /drafts/{id}/submissions`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    /// Version to anchor to; omitted means "checkpoint the live content".
    #[serde(default)]
    pub version_id: Option<DbId>,
}

/// Request body for approve and reject.
#[derive(Debug, Default, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub feedback: Option<String>,
}

/// GET /api/v1/drafts/{id}/submissions
pub async fn list_for_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(draft_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Submission>>>> {
    let submissions = state
        .workflow
        .submissions
        .list_for_draft(draft_id, user.user_id())
        .await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// POST /api/v1/drafts/{id}/submissions
pub async fn submit(
    State(state): State<AppState>,
    RequireProfile(user): RequireProfile,
    Path(draft_id): Path<DbId>,
    input: Option<Json<SubmitRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionReceipt>>)> {
    let Json(input) = input.unwrap_or_default();
    let receipt = state
        .workflow
        .submissions
        .submit(draft_id, &user.identity, input.version_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/submissions/pending
pub async fn list_pending(
    State(state): State<AppState>,
    RequireReviewer(user): RequireReviewer,
) -> AppResult<Json<DataResponse<Vec<PendingSubmission>>>> {
    let queue = state
        .workflow
        .submissions
        .list_pending(&user.identity)
        .await?;
    Ok(Json(DataResponse { data: queue }))
}

/// GET /api/v1/submissions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubmissionDetail>>> {
    let detail = state
        .workflow
        .submissions
        .get_submission(id, &user.identity)
        .await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/submissions/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireReviewer(user): RequireReviewer,
    Path(id): Path<DbId>,
    input: Option<Json<DecisionRequest>>,
) -> AppResult<Json<DataResponse<Submission>>> {
    let Json(input) = input.unwrap_or_default();
    let submission = state
        .workflow
        .submissions
        .approve(id, &user.identity, input.feedback.as_deref())
        .await?;
    Ok(Json(DataResponse { data: submission }))
}

/// POST /api/v1/submissions/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireReviewer(user): RequireReviewer,
    Path(id): Path<DbId>,
    input: Option<Json<DecisionRequest>>,
) -> AppResult<Json<DataResponse<Submission>>> {
    let Json(input) = input.unwrap_or_default();
    let submission = state
        .workflow
        .submissions
        .reject(id, &user.identity, input.feedback.as_deref())
        .await?;
    Ok(Json(DataResponse { data: submission }))
}
