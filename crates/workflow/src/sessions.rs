//! Real-time session authorization.
//!
//! Bridges a verified identity and an access decision into a grant for one
//! room. Every failure is an explicit denial; there is no anonymous or
//! degraded fallback session.

use std::sync::Arc;

use chrono::Utc;
use inkwell_core::error::CoreError;
use inkwell_core::identity::Identity;
use inkwell_core::room::parse_room_id;
use inkwell_core::session::{SessionGrant, SessionUserInfo};
use inkwell_core::types::DbId;
use serde::Serialize;

use crate::access::AccessControl;
use crate::identity::IdentityResolver;
use crate::providers::SessionTransport;
use crate::ServiceResult;

/// A minted grant and the transport token that carries it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionAuthorization {
    pub grant: SessionGrant,
    pub token: String,
}

fn denied(reason: &str) -> CoreError {
    CoreError::Forbidden(format!("Access to this room is denied: {reason}"))
}

#[derive(Clone)]
pub struct SessionAuthorizer {
    identity: IdentityResolver,
    access: AccessControl,
    transport: Arc<dyn SessionTransport>,
    ttl_secs: i64,
}

impl SessionAuthorizer {
    pub fn new(
        identity: IdentityResolver,
        access: AccessControl,
        transport: Arc<dyn SessionTransport>,
        ttl_secs: i64,
    ) -> Self {
        Self {
            identity,
            access,
            transport,
            ttl_secs,
        }
    }

    /// Authorize a raw credential for `room_id`.
    ///
    /// A missing credential is `Unauthenticated`, never an anonymous session.
    pub async fn authorize_credential(
        &self,
        credential: Option<&str>,
        room_id: &str,
    ) -> ServiceResult<SessionAuthorization> {
        let credential = credential
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CoreError::Unauthenticated("Missing credential".to_string()))?;
        let identity = self.identity.resolve(credential).await?;
        self.authorize_identity(&identity, room_id).await
    }

    /// Authorize an already-authenticated user for `room_id`.
    pub async fn authorize(
        &self,
        user_id: DbId,
        room_id: &str,
    ) -> ServiceResult<SessionAuthorization> {
        let identity = self.identity.identity_for(user_id).await?;
        self.authorize_identity(&identity, room_id).await
    }

    async fn authorize_identity(
        &self,
        identity: &Identity,
        room_id: &str,
    ) -> ServiceResult<SessionAuthorization> {
        let draft_id = parse_room_id(room_id).map_err(|_| denied("unknown room"))?;

        if !identity.profile_complete {
            return Err(denied("profile setup required").into());
        }

        // Missing and inaccessible drafts are indistinguishable here.
        let level = self
            .access
            .effective_access(draft_id, identity.user_id)
            .await?;
        if !level.can_edit() {
            tracing::info!(
                user_id = identity.user_id,
                draft_id,
                "Session authorization denied"
            );
            return Err(denied("not a collaborator on this draft").into());
        }

        let grant = SessionGrant::full_access(
            identity.user_id,
            draft_id,
            SessionUserInfo {
                name: identity.display_label().to_string(),
                role: identity.role,
            },
            Utc::now(),
            self.ttl_secs,
        );
        let token = self.transport.issue(&grant).await?;

        tracing::info!(
            user_id = identity.user_id,
            draft_id,
            access = level.as_str(),
            "Session authorized"
        );
        Ok(SessionAuthorization { grant, token })
    }
}
