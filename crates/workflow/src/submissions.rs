//! Submission workflow: submit, review, and the reviewer queue.
//!
//! Review decisions are compare-and-set against `pending` in the store, so of
//! two reviewers racing on the same submission exactly one wins and the other
//! gets `InvalidState`.

use std::sync::Arc;

use inkwell_core::access::AccessLevel;
use inkwell_core::error::CoreError;
use inkwell_core::identity::Identity;
use inkwell_core::submission::{resolve_feedback, transition, ReviewDecision, SubmissionStatus};
use inkwell_core::types::DbId;
use inkwell_db::models::submission::{
    CreateSubmission, DecideSubmission, PendingSubmission, ReviewStats, Submission,
};
use inkwell_db::models::version::DraftVersion;
use inkwell_db::DraftStore;
use inkwell_events::{DomainEvent, EventBus};
use serde::Serialize;

use crate::access::AccessControl;
use crate::ServiceResult;

/// Result of a successful `submit`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub submission: Submission,
    /// The checkpoint taken when the caller did not name a version.
    pub created_version: Option<DraftVersion>,
}

/// A submission together with the snapshot it points at.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDetail {
    pub submission: Submission,
    pub draft_title: String,
    pub version: Option<DraftVersion>,
}

fn submission_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Submission",
        id,
    }
}

fn require_reviewer(identity: &Identity) -> Result<(), CoreError> {
    identity.require_complete_profile()?;
    if identity.role.can_review() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only reviewers can review submissions".to_string(),
        ))
    }
}

#[derive(Clone)]
pub struct SubmissionWorkflow {
    store: Arc<dyn DraftStore>,
    access: AccessControl,
    events: Arc<EventBus>,
}

impl SubmissionWorkflow {
    pub fn new(store: Arc<dyn DraftStore>, access: AccessControl, events: Arc<EventBus>) -> Self {
        Self {
            store,
            access,
            events,
        }
    }

    /// Open a pending submission for a draft the caller owns.
    ///
    /// Without `version_id` the live content is checkpointed first, so every
    /// submission points at an immutable snapshot. Fails with `Conflict` while
    /// another submission for the draft is still pending.
    pub async fn submit(
        &self,
        draft_id: DbId,
        submitter: &Identity,
        version_id: Option<DbId>,
    ) -> ServiceResult<SubmissionReceipt> {
        submitter.require_complete_profile()?;
        self.access
            .require_owner(draft_id, submitter.user_id, "submit it for review")
            .await?;

        let (submission, created_version) = self
            .store
            .create_submission(&CreateSubmission {
                draft_id,
                submitted_by: submitter.user_id,
                version_id,
            })
            .await?;

        if let Some(version) = &created_version {
            self.events.emit(DomainEvent::VersionSaved {
                draft_id,
                version_id: version.id,
                version_number: version.version_number,
                actor_id: submitter.user_id,
            });
        }
        tracing::info!(
            submission_id = submission.id,
            draft_id,
            user_id = submitter.user_id,
            "Submission created"
        );
        self.events.emit(DomainEvent::SubmissionCreated {
            submission_id: submission.id,
            draft_id,
            version_id: submission.version_id,
            actor_id: submitter.user_id,
        });

        Ok(SubmissionReceipt {
            submission,
            created_version,
        })
    }

    /// Approve a pending submission. Blank feedback becomes the default text.
    pub async fn approve(
        &self,
        submission_id: DbId,
        reviewer: &Identity,
        feedback: Option<&str>,
    ) -> ServiceResult<Submission> {
        self.decide(submission_id, reviewer, ReviewDecision::Approve, feedback)
            .await
    }

    /// Reject a pending submission. Feedback is required.
    pub async fn reject(
        &self,
        submission_id: DbId,
        reviewer: &Identity,
        feedback: Option<&str>,
    ) -> ServiceResult<Submission> {
        self.decide(submission_id, reviewer, ReviewDecision::Reject, feedback)
            .await
    }

    async fn decide(
        &self,
        submission_id: DbId,
        reviewer: &Identity,
        decision: ReviewDecision,
        feedback: Option<&str>,
    ) -> ServiceResult<Submission> {
        require_reviewer(reviewer)?;

        let current = self
            .store
            .find_submission(submission_id)
            .await?
            .ok_or_else(|| submission_not_found(submission_id))?;
        let new_status = transition(current.status, decision)?;
        let feedback = resolve_feedback(decision, feedback)?;

        let decided = self
            .store
            .decide_submission(&DecideSubmission {
                submission_id,
                reviewer_id: reviewer.user_id,
                status: new_status,
                feedback,
            })
            .await?
            .ok_or_else(|| {
                CoreError::InvalidState(
                    "Submission was reviewed by someone else in the meantime".to_string(),
                )
            })?;

        tracing::info!(
            submission_id,
            draft_id = decided.draft_id,
            user_id = reviewer.user_id,
            status = %decided.status,
            "Submission reviewed"
        );
        self.events.emit(DomainEvent::SubmissionStatusChanged {
            submission_id,
            draft_id: decided.draft_id,
            old_status: SubmissionStatus::Pending,
            new_status: decided.status,
            actor_id: reviewer.user_id,
        });
        Ok(decided)
    }

    /// The review queue. Reviewers only.
    pub async fn list_pending(&self, reviewer: &Identity) -> ServiceResult<Vec<PendingSubmission>> {
        require_reviewer(reviewer)?;
        self.store.list_pending_submissions().await
    }

    /// A submission with its anchored snapshot.
    ///
    /// Visible to reviewers and to anyone who can edit the draft; everyone
    /// else gets `NotFound`.
    pub async fn get_submission(
        &self,
        submission_id: DbId,
        viewer: &Identity,
    ) -> ServiceResult<SubmissionDetail> {
        let submission = self
            .store
            .find_submission(submission_id)
            .await?
            .ok_or_else(|| submission_not_found(submission_id))?;

        let (draft, level) = self
            .access
            .load(submission.draft_id, viewer.user_id)
            .await?
            .ok_or_else(|| submission_not_found(submission_id))?;
        if level == AccessLevel::None && !viewer.role.can_review() {
            return Err(submission_not_found(submission_id).into());
        }

        let version = match submission.version_id {
            Some(id) => self.store.find_version(id).await?,
            None => None,
        };
        Ok(SubmissionDetail {
            submission,
            draft_title: draft.title,
            version,
        })
    }

    /// Submission history of a draft, newest first.
    pub async fn list_for_draft(
        &self,
        draft_id: DbId,
        user_id: DbId,
    ) -> ServiceResult<Vec<Submission>> {
        self.access.require_edit(draft_id, user_id).await?;
        self.store.list_submissions_for_draft(draft_id).await
    }

    /// Reviewer dashboard counters.
    pub async fn stats(&self, reviewer: &Identity) -> ServiceResult<ReviewStats> {
        require_reviewer(reviewer)?;
        self.store.review_stats().await
    }
}
