//! Room-scoped session grants for real-time editing.
//!
//! A grant is minted for exactly one room, carries the metadata other
//! participants see next to this user's cursor, and expires after a fixed
//! lifetime. There are no partial grants: anyone allowed in gets full access.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::room::room_id_for;
use crate::types::{DbId, Timestamp};

/// Default grant lifetime in seconds (1 hour).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Minimum grant lifetime in seconds.
pub const MIN_SESSION_TTL_SECS: i64 = 60;

/// Maximum grant lifetime in seconds (24 hours).
pub const MAX_SESSION_TTL_SECS: i64 = 86_400;

/// Permission attached to a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCapability {
    /// Read and write the room's shared document and presence.
    #[serde(rename = "room:write")]
    FullAccess,
}

/// Metadata shown to other participants in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUserInfo {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    pub user_id: DbId,
    pub draft_id: DbId,
    pub room_id: String,
    pub capability: SessionCapability,
    pub user_info: SessionUserInfo,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl SessionGrant {
    /// Mint a full-access grant for the room of `draft_id`.
    pub fn full_access(
        user_id: DbId,
        draft_id: DbId,
        user_info: SessionUserInfo,
        issued_at: Timestamp,
        ttl_secs: i64,
    ) -> Self {
        Self {
            user_id,
            draft_id,
            room_id: room_id_for(draft_id),
            capability: SessionCapability::FullAccess,
            user_info,
            issued_at,
            expires_at: issued_at + Duration::seconds(ttl_secs),
        }
    }
}

/// Validate a configured grant lifetime.
pub fn validate_session_ttl(secs: i64) -> Result<(), CoreError> {
    if secs < MIN_SESSION_TTL_SECS {
        return Err(CoreError::Validation(format!(
            "Session TTL must be at least {MIN_SESSION_TTL_SECS} seconds, got {secs}"
        )));
    }
    if secs > MAX_SESSION_TTL_SECS {
        return Err(CoreError::Validation(format!(
            "Session TTL must be at most {MAX_SESSION_TTL_SECS} seconds, got {secs}"
        )));
    }
    Ok(())
}
