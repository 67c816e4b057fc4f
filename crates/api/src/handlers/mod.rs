pub mod auth;
pub mod collaborators;
pub mod drafts;
pub mod me;
pub mod review;
pub mod sessions;
pub mod submissions;
pub mod versions;
