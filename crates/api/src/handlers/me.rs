//! Handlers for the caller's own identity and onboarding.

use axum::extract::State;
use axum::Json;
use inkwell_core::identity::Identity;
use inkwell_core::roles::Role;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /me/profile`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: String,
    pub role: Role,
}

/// GET /api/v1/me
pub async fn get_me(user: AuthUser) -> AppResult<Json<DataResponse<Identity>>> {
    Ok(Json(DataResponse {
        data: user.identity,
    }))
}

/// PUT /api/v1/me/profile
///
/// Choose a role and display name. This is the only write an incomplete
/// profile may perform.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<Identity>>> {
    let identity = state
        .workflow
        .identity
        .update_profile(user.user_id(), &input.display_name, input.role)
        .await?;
    Ok(Json(DataResponse { data: identity }))
}
