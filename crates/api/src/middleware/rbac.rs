//! Role and onboarding extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects the request with 403 before
//! the handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inkwell_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a completed profile (role and display name chosen).
///
/// ```ignore
/// async fn write_something(RequireProfile(user): RequireProfile) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireProfile(pub AuthUser);

impl FromRequestParts<AppState> for RequireProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.identity.require_complete_profile()?;
        Ok(RequireProfile(user))
    }
}

/// Requires the `reviewer` role on a completed profile.
pub struct RequireReviewer(pub AuthUser);

impl FromRequestParts<AppState> for RequireReviewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireProfile(user) = RequireProfile::from_request_parts(parts, state).await?;
        if !user.identity.role.can_review() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Reviewer role required".into(),
            )));
        }
        Ok(RequireReviewer(user))
    }
}
