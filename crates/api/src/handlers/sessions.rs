//! Real-time session authorization.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use inkwell_workflow::SessionAuthorization;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::bearer_token;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /sessions/authorize`.
#[derive(Debug, Deserialize)]
pub struct AuthorizeSessionRequest {
    pub room_id: String,
}

/// POST /api/v1/sessions/authorize
///
/// Called by the real-time client before joining a room. The bearer token is
/// read here rather than through `AuthUser` so that a missing credential is
/// rejected by the session authorizer itself.
pub async fn authorize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AuthorizeSessionRequest>,
) -> AppResult<Json<DataResponse<SessionAuthorization>>> {
    let credential = bearer_token(&headers)?;
    let authorization = state
        .workflow
        .sessions
        .authorize_credential(credential, &input.room_id)
        .await?;
    Ok(Json(DataResponse {
        data: authorization,
    }))
}
