//! Identity and role resolution.

use std::sync::Arc;

use inkwell_core::error::CoreError;
use inkwell_core::identity::{normalize_display_name, Identity};
use inkwell_core::roles::{validate_selectable_role, Role};
use inkwell_core::types::DbId;
use inkwell_db::models::user::UpdateProfile;
use inkwell_db::DraftStore;

use crate::providers::AuthProvider;
use crate::ServiceResult;

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn DraftStore>,
    auth: Arc<dyn AuthProvider>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn DraftStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    /// Resolve a bearer credential to the caller's identity.
    ///
    /// A credential that verifies but names a user who no longer exists is
    /// still `Unauthenticated`.
    pub async fn resolve(&self, credential: &str) -> ServiceResult<Identity> {
        let verified = self.auth.verify(credential).await?;
        self.identity_for(verified.user_id).await
    }

    /// Load the identity of an already-authenticated user id.
    pub async fn identity_for(&self, user_id: DbId) -> ServiceResult<Identity> {
        let user =
            self.store.find_user(user_id).await?.ok_or_else(|| {
                CoreError::Unauthenticated("Account no longer exists".to_string())
            })?;
        Ok(user.identity())
    }

    pub async fn profile_complete(&self, user_id: DbId) -> ServiceResult<bool> {
        Ok(self.identity_for(user_id).await?.profile_complete)
    }

    /// Complete or change the caller's profile.
    pub async fn update_profile(
        &self,
        user_id: DbId,
        display_name: &str,
        role: Role,
    ) -> ServiceResult<Identity> {
        validate_selectable_role(role)?;
        let display_name = normalize_display_name(display_name)?;

        let user = self
            .store
            .update_profile(user_id, &UpdateProfile { display_name, role })
            .await?
            .ok_or_else(|| CoreError::Unauthenticated("Account no longer exists".to_string()))?;

        tracing::info!(user_id, role = %user.role, "Profile updated");
        Ok(user.identity())
    }
}
