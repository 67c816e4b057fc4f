//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access tokens and the [`AuthProvider`](inkwell_workflow::AuthProvider) built on them.
//! - [`session_token`] -- signed room-session tokens for the real-time transport.

pub mod jwt;
pub mod password;
pub mod session_token;
