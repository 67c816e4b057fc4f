//! The persistence seam between the workflow services and storage.
//!
//! Every method may suspend on I/O. Methods documented as atomic either
//! commit fully or leave no trace; implementations must serialize them per
//! draft so concurrent callers never observe or allocate the same version
//! number.

use async_trait::async_trait;
use inkwell_core::types::{DbId, VersionNumber};

use crate::error::StoreResult;
use crate::models::collaborator::{Collaborator, CollaboratorWithUser, CreateCollaborator};
use crate::models::draft::{CreateDraft, Draft, UpdateDraft};
use crate::models::submission::{
    CreateSubmission, DecideSubmission, PendingSubmission, ReviewStats, Submission,
};
use crate::models::user::{CreateUser, UpdateProfile, User};
use crate::models::version::{CreateVersion, DraftVersion, RestoreOutcome};

#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Verify the backing storage is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    // ── Users ────────────────────────────────────────────────────────

    /// Insert a new `unassigned` user. Duplicate email fails with `Conflict`.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Set display name and role. Returns `None` if the user does not exist.
    async fn update_profile(&self, id: DbId, input: &UpdateProfile) -> StoreResult<Option<User>>;

    // ── Drafts ───────────────────────────────────────────────────────

    async fn create_draft(&self, input: &CreateDraft) -> StoreResult<Draft>;

    async fn find_draft(&self, id: DbId) -> StoreResult<Option<Draft>>;

    /// Apply non-`None` fields. Returns `None` if the draft does not exist.
    async fn update_draft(&self, id: DbId, input: &UpdateDraft) -> StoreResult<Option<Draft>>;

    /// Drafts owned by `user_id`, most recently updated first.
    async fn list_drafts_owned_by(&self, user_id: DbId) -> StoreResult<Vec<Draft>>;

    /// Drafts on which `user_id` holds a collaborator grant.
    async fn list_drafts_shared_with(&self, user_id: DbId) -> StoreResult<Vec<Draft>>;

    // ── Collaborators ────────────────────────────────────────────────

    async fn has_grant(&self, draft_id: DbId, user_id: DbId) -> StoreResult<bool>;

    /// Insert a grant. A duplicate `(draft, user)` pair fails with `Conflict`.
    async fn create_grant(&self, input: &CreateCollaborator) -> StoreResult<Collaborator>;

    async fn find_grant(&self, grant_id: DbId) -> StoreResult<Option<Collaborator>>;

    /// Remove a grant. Returns `true` if a row was removed.
    async fn delete_grant(&self, grant_id: DbId) -> StoreResult<bool>;

    async fn list_grants(&self, draft_id: DbId) -> StoreResult<Vec<CollaboratorWithUser>>;

    // ── Versions ─────────────────────────────────────────────────────

    /// Atomically allocate the next version number, insert the snapshot and
    /// set the draft's live content to it. Fails with `NotFound` if the draft
    /// does not exist.
    async fn create_version(&self, input: &CreateVersion) -> StoreResult<DraftVersion>;

    /// All versions of a draft, newest first.
    async fn list_versions(&self, draft_id: DbId) -> StoreResult<Vec<DraftVersion>>;

    async fn find_version(&self, id: DbId) -> StoreResult<Option<DraftVersion>>;

    async fn find_version_by_number(
        &self,
        draft_id: DbId,
        number: VersionNumber,
    ) -> StoreResult<Option<DraftVersion>>;

    async fn latest_version_number(&self, draft_id: DbId) -> StoreResult<Option<VersionNumber>>;

    /// Every existing version number of a draft, ascending.
    async fn version_numbers(&self, draft_id: DbId) -> StoreResult<Vec<VersionNumber>>;

    /// Atomically reset the draft's live content to version `target` and
    /// delete every newer version.
    ///
    /// Fails with `NotFound` if `target` does not exist, and with `Conflict`
    /// if `expected_deleted_count` no longer matches or a pending submission
    /// is anchored to a version that would be deleted.
    async fn restore_version(
        &self,
        draft_id: DbId,
        target: VersionNumber,
        expected_deleted_count: Option<i64>,
    ) -> StoreResult<RestoreOutcome>;

    // ── Submissions ──────────────────────────────────────────────────

    /// Atomically open a `pending` submission.
    ///
    /// Fails with `Conflict` if the draft already has a pending submission and
    /// with `NotFound` if an explicit version does not belong to the draft.
    /// Returns the version created when none was supplied.
    async fn create_submission(
        &self,
        input: &CreateSubmission,
    ) -> StoreResult<(Submission, Option<DraftVersion>)>;

    async fn find_submission(&self, id: DbId) -> StoreResult<Option<Submission>>;

    async fn list_submissions_for_draft(&self, draft_id: DbId) -> StoreResult<Vec<Submission>>;

    /// The review queue, newest first.
    async fn list_pending_submissions(&self) -> StoreResult<Vec<PendingSubmission>>;

    /// Compare-and-set a reviewer decision against `pending`.
    ///
    /// Returns `None` when the submission is missing or no longer pending; of
    /// two racing reviewers exactly one gets `Some`.
    async fn decide_submission(&self, input: &DecideSubmission) -> StoreResult<Option<Submission>>;

    async fn review_stats(&self) -> StoreResult<ReviewStats>;
}
