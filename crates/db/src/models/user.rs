//! User entity model and DTOs.

use inkwell_core::identity::Identity;
use inkwell_core::roles::Role;
use inkwell_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The caller identity this account resolves to.
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.id,
            self.email.clone(),
            self.role,
            self.display_name.clone(),
        )
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. New accounts always start `unassigned`.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}

/// DTO for completing or changing a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub display_name: String,
    pub role: Role,
}
