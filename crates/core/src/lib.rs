//! Inkwell domain core.
//!
//! Pure rules shared by the persistence, workflow and HTTP layers. Nothing in
//! this crate performs I/O: every function here is deterministic over its
//! inputs so the same checks can run in a database transaction, an in-memory
//! store, or a request handler.

pub mod access;
pub mod error;
pub mod identity;
pub mod roles;
pub mod room;
pub mod session;
pub mod submission;
pub mod types;
pub mod versioning;
