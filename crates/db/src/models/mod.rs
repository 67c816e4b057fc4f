//! Row models and DTOs, one module per table.

pub mod collaborator;
pub mod draft;
pub mod event;
pub mod submission;
pub mod user;
pub mod version;
