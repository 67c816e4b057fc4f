//! External collaborators the workflow depends on but does not implement.

use async_trait::async_trait;
use inkwell_core::error::CoreError;
use inkwell_core::session::SessionGrant;
use inkwell_core::types::DbId;

/// What an authentication provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredential {
    pub user_id: DbId,
    pub email: String,
}

/// Verifies an opaque bearer credential.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Fails with `Unauthenticated` for a missing, malformed or expired
    /// credential.
    async fn verify(&self, credential: &str) -> Result<VerifiedCredential, CoreError>;
}

/// Turns a session grant into the token the real-time client library expects.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn issue(&self, grant: &SessionGrant) -> Result<String, CoreError>;
}
