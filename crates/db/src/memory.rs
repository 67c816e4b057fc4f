//! In-process [`DraftStore`] used by tests and database-less local runs.
//!
//! One mutex guards all tables, so every operation is trivially atomic and
//! serialized. Constraint violations surface with the same error kinds the
//! Postgres store produces.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use inkwell_core::error::CoreError;
use inkwell_core::roles::Role;
use inkwell_core::submission::SubmissionStatus;
use inkwell_core::types::{DbId, VersionNumber};
use inkwell_core::versioning::{check_confirmation, next_version_number, plan_restore};

use crate::error::StoreResult;
use crate::models::collaborator::{Collaborator, CollaboratorWithUser, CreateCollaborator};
use crate::models::draft::{CreateDraft, Draft, UpdateDraft};
use crate::models::submission::{
    CreateSubmission, DecideSubmission, PendingSubmission, ReviewStats, Submission,
};
use crate::models::user::{CreateUser, UpdateProfile, User};
use crate::models::version::{CreateVersion, DraftVersion, RestoreOutcome};
use crate::store::DraftStore;

#[derive(Default)]
struct Tables {
    users: BTreeMap<DbId, User>,
    drafts: BTreeMap<DbId, Draft>,
    versions: BTreeMap<DbId, DraftVersion>,
    grants: BTreeMap<DbId, Collaborator>,
    submissions: BTreeMap<DbId, Submission>,
    last_id: DbId,
}

impl Tables {
    /// One sequence shared by every table.
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn version_numbers(&self, draft_id: DbId) -> Vec<VersionNumber> {
        let mut numbers: Vec<_> = self
            .versions
            .values()
            .filter(|v| v.draft_id == draft_id)
            .map(|v| v.version_number)
            .collect();
        numbers.sort_unstable();
        numbers
    }

    fn insert_next_version(
        &mut self,
        draft_id: DbId,
        content: &str,
        created_by: Option<DbId>,
    ) -> DraftVersion {
        let latest = self.version_numbers(draft_id).last().copied();
        let version = DraftVersion {
            id: self.next_id(),
            draft_id,
            version_number: next_version_number(latest),
            content: content.to_string(),
            created_by,
            created_at: Utc::now(),
        };
        self.versions.insert(version.id, version.clone());
        version
    }

    fn draft_mut(&mut self, draft_id: DbId) -> Result<&mut Draft, CoreError> {
        self.drafts
            .get_mut(&draft_id)
            .ok_or_else(|| CoreError::draft_not_found(draft_id))
    }
}

fn unique_violation(constraint: &str) -> CoreError {
    CoreError::Conflict(format!(
        "Duplicate value violates unique constraint: {constraint}"
    ))
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, DbId)) {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, CoreError> {
        self.tables
            .lock()
            .map_err(|_| CoreError::Internal("Failed to lock in-memory store".to_string()))
    }
}

#[async_trait]
impl DraftStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        self.tables()?;
        Ok(())
    }

    // -- Users --

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut t = self.tables()?;
        if t.users.values().any(|u| u.email == input.email) {
            return Err(unique_violation("uq_users_email").into());
        }
        let now = Utc::now();
        let user = User {
            id: t.next_id(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            display_name: None,
            role: Role::Unassigned,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_profile(&self, id: DbId, input: &UpdateProfile) -> StoreResult<Option<User>> {
        let mut t = self.tables()?;
        Ok(t.users.get_mut(&id).map(|user| {
            user.display_name = Some(input.display_name.clone());
            user.role = input.role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    // -- Drafts --

    async fn create_draft(&self, input: &CreateDraft) -> StoreResult<Draft> {
        let mut t = self.tables()?;
        let now = Utc::now();
        let draft = Draft {
            id: t.next_id(),
            owner_id: input.owner_id,
            title: input.title.clone(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        };
        t.drafts.insert(draft.id, draft.clone());
        Ok(draft)
    }

    async fn find_draft(&self, id: DbId) -> StoreResult<Option<Draft>> {
        Ok(self.tables()?.drafts.get(&id).cloned())
    }

    async fn update_draft(&self, id: DbId, input: &UpdateDraft) -> StoreResult<Option<Draft>> {
        let mut t = self.tables()?;
        Ok(t.drafts.get_mut(&id).map(|draft| {
            if let Some(title) = &input.title {
                draft.title = title.clone();
            }
            if let Some(content) = &input.content {
                draft.content = content.clone();
            }
            draft.updated_at = Utc::now();
            draft.clone()
        }))
    }

    async fn list_drafts_owned_by(&self, user_id: DbId) -> StoreResult<Vec<Draft>> {
        let t = self.tables()?;
        let mut drafts: Vec<_> = t
            .drafts
            .values()
            .filter(|d| d.owner_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut drafts, |d| (d.updated_at, d.id));
        Ok(drafts)
    }

    async fn list_drafts_shared_with(&self, user_id: DbId) -> StoreResult<Vec<Draft>> {
        let t = self.tables()?;
        let mut drafts: Vec<_> = t
            .grants
            .values()
            .filter(|g| g.user_id == user_id)
            .filter_map(|g| t.drafts.get(&g.draft_id).cloned())
            .collect();
        newest_first(&mut drafts, |d| (d.updated_at, d.id));
        Ok(drafts)
    }

    // -- Collaborators --

    async fn has_grant(&self, draft_id: DbId, user_id: DbId) -> StoreResult<bool> {
        Ok(self
            .tables()?
            .grants
            .values()
            .any(|g| g.draft_id == draft_id && g.user_id == user_id))
    }

    async fn create_grant(&self, input: &CreateCollaborator) -> StoreResult<Collaborator> {
        let mut t = self.tables()?;
        if !t.drafts.contains_key(&input.draft_id) {
            return Err(CoreError::draft_not_found(input.draft_id).into());
        }
        if t.grants
            .values()
            .any(|g| g.draft_id == input.draft_id && g.user_id == input.user_id)
        {
            return Err(unique_violation("uq_draft_collaborators_draft_user").into());
        }
        let grant = Collaborator {
            id: t.next_id(),
            draft_id: input.draft_id,
            user_id: input.user_id,
            added_by: input.added_by,
            created_at: Utc::now(),
        };
        t.grants.insert(grant.id, grant.clone());
        Ok(grant)
    }

    async fn find_grant(&self, grant_id: DbId) -> StoreResult<Option<Collaborator>> {
        Ok(self.tables()?.grants.get(&grant_id).cloned())
    }

    async fn delete_grant(&self, grant_id: DbId) -> StoreResult<bool> {
        Ok(self.tables()?.grants.remove(&grant_id).is_some())
    }

    async fn list_grants(&self, draft_id: DbId) -> StoreResult<Vec<CollaboratorWithUser>> {
        let t = self.tables()?;
        let mut grants: Vec<_> = t
            .grants
            .values()
            .filter(|g| g.draft_id == draft_id)
            .filter_map(|g| {
                t.users.get(&g.user_id).map(|u| CollaboratorWithUser {
                    id: g.id,
                    draft_id: g.draft_id,
                    user_id: g.user_id,
                    added_by: g.added_by,
                    created_at: g.created_at,
                    email: u.email.clone(),
                    display_name: u.display_name.clone(),
                    role: u.role,
                })
            })
            .collect();
        grants.sort_by_key(|g| (g.created_at, g.id));
        Ok(grants)
    }

    // -- Versions --

    async fn create_version(&self, input: &CreateVersion) -> StoreResult<DraftVersion> {
        let mut t = self.tables()?;
        let live = t.draft_mut(input.draft_id)?.content.clone();
        let Some(content) = &input.content else {
            return Ok(t.insert_next_version(input.draft_id, &live, input.created_by));
        };
        let version = t.insert_next_version(input.draft_id, content, input.created_by);
        let draft = t.draft_mut(input.draft_id)?;
        draft.content = content.clone();
        draft.updated_at = Utc::now();
        Ok(version)
    }

    async fn list_versions(&self, draft_id: DbId) -> StoreResult<Vec<DraftVersion>> {
        let t = self.tables()?;
        let mut versions: Vec<_> = t
            .versions
            .values()
            .filter(|v| v.draft_id == draft_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| std::cmp::Reverse(v.version_number));
        Ok(versions)
    }

    async fn find_version(&self, id: DbId) -> StoreResult<Option<DraftVersion>> {
        Ok(self.tables()?.versions.get(&id).cloned())
    }

    async fn find_version_by_number(
        &self,
        draft_id: DbId,
        number: VersionNumber,
    ) -> StoreResult<Option<DraftVersion>> {
        Ok(self
            .tables()?
            .versions
            .values()
            .find(|v| v.draft_id == draft_id && v.version_number == number)
            .cloned())
    }

    async fn latest_version_number(&self, draft_id: DbId) -> StoreResult<Option<VersionNumber>> {
        Ok(self.tables()?.version_numbers(draft_id).last().copied())
    }

    async fn version_numbers(&self, draft_id: DbId) -> StoreResult<Vec<VersionNumber>> {
        Ok(self.tables()?.version_numbers(draft_id))
    }

    async fn restore_version(
        &self,
        draft_id: DbId,
        target: VersionNumber,
        expected_deleted_count: Option<i64>,
    ) -> StoreResult<RestoreOutcome> {
        let mut t = self.tables()?;
        t.draft_mut(draft_id)?;

        let plan = plan_restore(draft_id, &t.version_numbers(draft_id), target)?;
        check_confirmation(&plan, expected_deleted_count)?;

        let doomed: Vec<DbId> = t
            .versions
            .values()
            .filter(|v| v.draft_id == draft_id && v.version_number > target)
            .map(|v| v.id)
            .collect();

        let anchored_pending = t.submissions.values().any(|s| {
            s.status == SubmissionStatus::Pending
                && s.version_id.is_some_and(|id| doomed.contains(&id))
        });
        if anchored_pending {
            return Err(CoreError::Conflict(format!(
                "A pending submission references a version newer than {target}; \
                 it must be reviewed before restoring"
            ))
            .into());
        }

        let content = t
            .versions
            .values()
            .find(|v| v.draft_id == draft_id && v.version_number == target)
            .map(|v| v.content.clone())
            .unwrap_or_default();

        for id in &doomed {
            t.versions.remove(id);
        }
        for submission in t.submissions.values_mut() {
            if submission.version_id.is_some_and(|id| doomed.contains(&id)) {
                submission.version_id = None;
            }
        }

        let draft = t.draft_mut(draft_id)?;
        draft.content = content;
        draft.updated_at = Utc::now();

        Ok(RestoreOutcome {
            draft: draft.clone(),
            target_version_number: plan.target_version_number,
            deleted_count: doomed.len() as i64,
        })
    }

    // -- Submissions --

    async fn create_submission(
        &self,
        input: &CreateSubmission,
    ) -> StoreResult<(Submission, Option<DraftVersion>)> {
        let mut t = self.tables()?;
        let content = t.draft_mut(input.draft_id)?.content.clone();

        if t.submissions
            .values()
            .any(|s| s.draft_id == input.draft_id && s.status == SubmissionStatus::Pending)
        {
            return Err(CoreError::Conflict(
                "This draft already has a submission awaiting review".to_string(),
            )
            .into());
        }

        let (version_id, created) = match input.version_id {
            Some(version_id) => {
                let belongs = t
                    .versions
                    .get(&version_id)
                    .is_some_and(|v| v.draft_id == input.draft_id);
                if !belongs {
                    return Err(CoreError::NotFound {
                        entity: "DraftVersion",
                        id: version_id,
                    }
                    .into());
                }
                (version_id, None)
            }
            None => {
                let version =
                    t.insert_next_version(input.draft_id, &content, Some(input.submitted_by));
                (version.id, Some(version))
            }
        };

        let submission = Submission {
            id: t.next_id(),
            draft_id: input.draft_id,
            version_id: Some(version_id),
            submitted_by: input.submitted_by,
            status: SubmissionStatus::Pending,
            feedback: None,
            reviewed_by: None,
            submitted_at: Utc::now(),
            reviewed_at: None,
        };
        t.submissions.insert(submission.id, submission.clone());
        Ok((submission, created))
    }

    async fn find_submission(&self, id: DbId) -> StoreResult<Option<Submission>> {
        Ok(self.tables()?.submissions.get(&id).cloned())
    }

    async fn list_submissions_for_draft(&self, draft_id: DbId) -> StoreResult<Vec<Submission>> {
        let t = self.tables()?;
        let mut submissions: Vec<_> = t
            .submissions
            .values()
            .filter(|s| s.draft_id == draft_id)
            .cloned()
            .collect();
        newest_first(&mut submissions, |s| (s.submitted_at, s.id));
        Ok(submissions)
    }

    async fn list_pending_submissions(&self) -> StoreResult<Vec<PendingSubmission>> {
        let t = self.tables()?;
        let mut queue: Vec<_> = t
            .submissions
            .values()
            .filter(|s| s.status == SubmissionStatus::Pending)
            .filter_map(|s| {
                let draft = t.drafts.get(&s.draft_id)?;
                let version_number = s
                    .version_id
                    .and_then(|id| t.versions.get(&id))
                    .map(|v| v.version_number);
                let submitter_name = t
                    .users
                    .get(&s.submitted_by)
                    .map(|u| u.display_name.clone().unwrap_or_else(|| u.email.clone()));
                Some(PendingSubmission {
                    id: s.id,
                    draft_id: s.draft_id,
                    draft_title: draft.title.clone(),
                    version_id: s.version_id,
                    version_number,
                    submitted_by: s.submitted_by,
                    submitter_name,
                    submitted_at: s.submitted_at,
                })
            })
            .collect();
        newest_first(&mut queue, |s| (s.submitted_at, s.id));
        Ok(queue)
    }

    async fn decide_submission(&self, input: &DecideSubmission) -> StoreResult<Option<Submission>> {
        let mut t = self.tables()?;
        Ok(t.submissions
            .get_mut(&input.submission_id)
            .filter(|s| s.status == SubmissionStatus::Pending)
            .map(|s| {
                s.status = input.status;
                s.feedback = Some(input.feedback.clone());
                s.reviewed_by = Some(input.reviewer_id);
                s.reviewed_at = Some(Utc::now());
                s.clone()
            }))
    }

    async fn review_stats(&self) -> StoreResult<ReviewStats> {
        let t = self.tables()?;
        let count_status = |status: SubmissionStatus| {
            t.submissions
                .values()
                .filter(|s| s.status == status)
                .count() as i64
        };
        Ok(ReviewStats {
            author_count: t.users.values().filter(|u| u.role == Role::Author).count() as i64,
            pending_submissions: count_status(SubmissionStatus::Pending),
            approved_submissions: count_status(SubmissionStatus::Approved),
        })
    }
}
