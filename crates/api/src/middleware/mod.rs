//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- resolves the caller from a JWT Bearer token.
//! - [`rbac::RequireProfile`] -- requires a completed profile.
//! - [`rbac::RequireReviewer`] -- requires the `reviewer` role.

pub mod auth;
pub mod rbac;
