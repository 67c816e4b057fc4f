//! Signed room-session tokens handed to the real-time transport.
//!
//! A [`SessionGrant`] is serialized into an HS256 JWT signed with the session
//! secret. The transport verifies it with [`validate_session_token`] and must
//! also check that the token's `room` matches the room being joined.

use async_trait::async_trait;
use inkwell_core::error::CoreError;
use inkwell_core::roles::Role;
use inkwell_core::session::{SessionCapability, SessionGrant};
use inkwell_core::types::DbId;
use inkwell_workflow::SessionTransport;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Claims embedded in a room-session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: DbId,
    pub draft_id: DbId,
    /// The only room this token opens.
    pub room: String,
    pub cap: SessionCapability,
    /// Name shown next to this user's cursor.
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl From<&SessionGrant> for SessionClaims {
    fn from(grant: &SessionGrant) -> Self {
        Self {
            sub: grant.user_id,
            draft_id: grant.draft_id,
            room: grant.room_id.clone(),
            cap: grant.capability,
            name: grant.user_info.name.clone(),
            role: grant.user_info.role,
            iat: grant.issued_at.timestamp(),
            exp: grant.expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Issues session tokens signed with the configured session secret.
pub struct JwtSessionTransport {
    secret: String,
}

impl JwtSessionTransport {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            secret: config.secret.clone(),
        }
    }
}

#[async_trait]
impl SessionTransport for JwtSessionTransport {
    async fn issue(&self, grant: &SessionGrant) -> Result<String, CoreError> {
        encode(
            &Header::default(),
            &SessionClaims::from(grant),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| CoreError::Internal(format!("Session token encoding failed: {e}")))
    }
}

/// Verify a session token's signature and expiry.
pub fn validate_session_token(
    token: &str,
    secret: &str,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
