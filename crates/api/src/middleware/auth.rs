//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use inkwell_core::error::CoreError;
use inkwell_core::identity::Identity;
use inkwell_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller, resolved from the `Authorization: Bearer <token>` header.
///
/// Resolution goes through the workflow's identity resolver, so the role and
/// display name are always current even if they changed after login.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
}

impl AuthUser {
    pub fn user_id(&self) -> DbId {
        self.identity.user_id
    }
}

/// The raw bearer token from `headers`, if one was sent.
///
/// `Err` when the header is present but not in `Bearer <token>` form.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get("authorization") else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated(
                "Missing Authorization header".into(),
            ))
        })?;

        let identity = state.workflow.identity.resolve(token).await?;
        Ok(AuthUser { identity })
    }
}
