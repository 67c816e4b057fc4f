//! Repository layer: one zero-sized struct per table with async query helpers.
//!
//! Plain reads and writes take `&PgPool`. Multi-statement operations that must
//! be atomic open their own transaction and hold a row lock on the parent
//! draft for its duration.

pub mod collaborator_repo;
pub mod draft_repo;
pub mod event_repo;
pub mod submission_repo;
pub mod user_repo;
pub mod version_repo;

pub use collaborator_repo::CollaboratorRepo;
pub use draft_repo::DraftRepo;
pub use event_repo::EventRepo;
pub use submission_repo::SubmissionRepo;
pub use user_repo::UserRepo;
pub use version_repo::VersionRepo;
