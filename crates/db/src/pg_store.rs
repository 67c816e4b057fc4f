//! PostgreSQL-backed [`DraftStore`].

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
use crate::repositories::{CollaboratorRepo, DraftRepo, SubmissionRepo, UserRepo, VersionRepo};
use crate::retry::read_with_retry;
use crate::store::DraftStore;
use crate::DbPool;

/// Delegates to the static repositories. Reads retry once on transient
/// connection failures; writes never retry.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl DraftStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(read_with_retry("find_user", || UserRepo::find_by_id(&self.pool, id)).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(read_with_retry("find_user_by_email", || {
            UserRepo::find_by_email(&self.pool, email)
        })
        .await?)
    }

    async fn update_profile(&self, id: DbId, input: &UpdateProfile) -> StoreResult<Option<User>> {
        Ok(UserRepo::update_profile(&self.pool, id, input).await?)
    }

    async fn create_draft(&self, input: &CreateDraft) -> StoreResult<Draft> {
        Ok(DraftRepo::create(&self.pool, input).await?)
    }

    async fn find_draft(&self, id: DbId) -> StoreResult<Option<Draft>> {
        Ok(read_with_retry("find_draft", || DraftRepo::find_by_id(&self.pool, id)).await?)
    }

    async fn update_draft(&self, id: DbId, input: &UpdateDraft) -> StoreResult<Option<Draft>> {
        Ok(DraftRepo::update(&self.pool, id, input).await?)
    }

    async fn list_drafts_owned_by(&self, user_id: DbId) -> StoreResult<Vec<Draft>> {
        Ok(read_with_retry("list_drafts_owned_by", || {
            DraftRepo::list_by_owner(&self.pool, user_id)
        })
        .await?)
    }

    async fn list_drafts_shared_with(&self, user_id: DbId) -> StoreResult<Vec<Draft>> {
        Ok(read_with_retry("list_drafts_shared_with", || {
            DraftRepo::list_shared_with(&self.pool, user_id)
        })
        .await?)
    }

    async fn has_grant(&self, draft_id: DbId, user_id: DbId) -> StoreResult<bool> {
        Ok(read_with_retry("has_grant", || {
            CollaboratorRepo::exists(&self.pool, draft_id, user_id)
        })
        .await?)
    }

    async fn create_grant(&self, input: &CreateCollaborator) -> StoreResult<Collaborator> {
        Ok(CollaboratorRepo::create(&self.pool, input).await?)
    }

    async fn find_grant(&self, grant_id: DbId) -> StoreResult<Option<Collaborator>> {
        Ok(read_with_retry("find_grant", || {
            CollaboratorRepo::find_by_id(&self.pool, grant_id)
        })
        .await?)
    }

    async fn delete_grant(&self, grant_id: DbId) -> StoreResult<bool> {
        Ok(CollaboratorRepo::delete(&self.pool, grant_id).await?)
    }

    async fn list_grants(&self, draft_id: DbId) -> StoreResult<Vec<CollaboratorWithUser>> {
        Ok(read_with_retry("list_grants", || {
            CollaboratorRepo::list_for_draft(&self.pool, draft_id)
        })
        .await?)
    }

    async fn create_version(&self, input: &CreateVersion) -> StoreResult<DraftVersion> {
        VersionRepo::create_next(&self.pool, input).await
    }

    async fn list_versions(&self, draft_id: DbId) -> StoreResult<Vec<DraftVersion>> {
        Ok(read_with_retry("list_versions", || {
            VersionRepo::list_for_draft(&self.pool, draft_id)
        })
        .await?)
    }

    async fn find_version(&self, id: DbId) -> StoreResult<Option<DraftVersion>> {
        Ok(read_with_retry("find_version", || VersionRepo::find_by_id(&self.pool, id)).await?)
    }

    async fn find_version_by_number(
        &self,
        draft_id: DbId,
        number: VersionNumber,
    ) -> StoreResult<Option<DraftVersion>> {
        Ok(read_with_retry("find_version_by_number", || {
            VersionRepo::find_by_number(&self.pool, draft_id, number)
        })
        .await?)
    }

    async fn latest_version_number(&self, draft_id: DbId) -> StoreResult<Option<VersionNumber>> {
        Ok(read_with_retry("latest_version_number", || {
            VersionRepo::latest_number(&self.pool, draft_id)
        })
        .await?)
    }

    async fn version_numbers(&self, draft_id: DbId) -> StoreResult<Vec<VersionNumber>> {
        Ok(read_with_retry("version_numbers", || {
            VersionRepo::numbers_for_draft(&self.pool, draft_id)
        })
        .await?)
    }

    async fn restore_version(
        &self,
        draft_id: DbId,
        target: VersionNumber,
        expected_deleted_count: Option<i64>,
    ) -> StoreResult<RestoreOutcome> {
        VersionRepo::restore(&self.pool, draft_id, target, expected_deleted_count).await
    }

    async fn create_submission(
        &self,
        input: &CreateSubmission,
    ) -> StoreResult<(Submission, Option<DraftVersion>)> {
        SubmissionRepo::create(&self.pool, input).await
    }

    async fn find_submission(&self, id: DbId) -> StoreResult<Option<Submission>> {
        Ok(read_with_retry("find_submission", || {
            SubmissionRepo::find_by_id(&self.pool, id)
        })
        .await?)
    }

    async fn list_submissions_for_draft(&self, draft_id: DbId) -> StoreResult<Vec<Submission>> {
        Ok(read_with_retry("list_submissions_for_draft", || {
            SubmissionRepo::list_for_draft(&self.pool, draft_id)
        })
        .await?)
    }

    async fn list_pending_submissions(&self) -> StoreResult<Vec<PendingSubmission>> {
        Ok(read_with_retry("list_pending_submissions", || {
            SubmissionRepo::list_pending(&self.pool)
        })
        .await?)
    }

    async fn decide_submission(&self, input: &DecideSubmission) -> StoreResult<Option<Submission>> {
        Ok(SubmissionRepo::decide(&self.pool, input).await?)
    }

    async fn review_stats(&self) -> StoreResult<ReviewStats> {
        Ok(read_with_retry("review_stats", || SubmissionRepo::stats(&self.pool)).await?)
    }
}
