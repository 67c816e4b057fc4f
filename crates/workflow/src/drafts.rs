//! Drafts, version checkpoints and restore.

use std::sync::Arc;

use inkwell_core::error::CoreError;
use inkwell_core::identity::Identity;
use inkwell_core::types::{DbId, VersionNumber};
use inkwell_core::versioning::{plan_restore, validate_version_number, RestorePlan};
use inkwell_db::models::draft::{CreateDraft, Draft, UpdateDraft};
use inkwell_db::models::version::{CreateVersion, DraftVersion, RestoreOutcome};
use inkwell_db::DraftStore;
use inkwell_events::{DomainEvent, EventBus};

use crate::access::AccessControl;
use crate::ServiceResult;

/// Maximum length of a draft title.
pub const MAX_TITLE_LENGTH: usize = 200;

fn normalize_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone)]
pub struct DraftService {
    store: Arc<dyn DraftStore>,
    access: AccessControl,
    events: Arc<EventBus>,
}

impl DraftService {
    pub fn new(store: Arc<dyn DraftStore>, access: AccessControl, events: Arc<EventBus>) -> Self {
        Self {
            store,
            access,
            events,
        }
    }

    /// Create an empty draft owned by the caller. Authors only.
    pub async fn create_draft(&self, owner: &Identity, title: &str) -> ServiceResult<Draft> {
        owner.require_complete_profile()?;
        if !owner.role.can_author() {
            return Err(CoreError::Forbidden("Only authors can create drafts".to_string()).into());
        }
        let title = normalize_title(title)?;

        let draft = self
            .store
            .create_draft(&CreateDraft {
                owner_id: owner.user_id,
                title,
            })
            .await?;

        tracing::info!(
            draft_id = draft.id,
            user_id = owner.user_id,
            "Draft created"
        );
        self.events.emit(DomainEvent::DraftCreated {
            draft_id: draft.id,
            owner_id: owner.user_id,
        });
        Ok(draft)
    }

    pub async fn get_draft(&self, draft_id: DbId, user_id: DbId) -> ServiceResult<Draft> {
        self.access.require_edit(draft_id, user_id).await
    }

    /// Change the title or live content. This is the path real-time edits
    /// are persisted through, so any user with edit access may call it.
    pub async fn update_draft(
        &self,
        draft_id: DbId,
        editor: &Identity,
        input: UpdateDraft,
    ) -> ServiceResult<Draft> {
        editor.require_complete_profile()?;
        self.access.require_edit(draft_id, editor.user_id).await?;

        let input = UpdateDraft {
            title: input.title.as_deref().map(normalize_title).transpose()?,
            content: input.content,
        };
        self.store
            .update_draft(draft_id, &input)
            .await?
            .ok_or_else(|| CoreError::draft_not_found(draft_id).into())
    }

    pub async fn list_owned(&self, user_id: DbId) -> ServiceResult<Vec<Draft>> {
        self.store.list_drafts_owned_by(user_id).await
    }

    pub async fn list_shared(&self, user_id: DbId) -> ServiceResult<Vec<Draft>> {
        self.store.list_drafts_shared_with(user_id).await
    }

    // -- Versions --

    /// Checkpoint the draft. Without explicit `content` the current live
    /// content is snapshotted.
    pub async fn create_version(
        &self,
        draft_id: DbId,
        editor: &Identity,
        content: Option<String>,
    ) -> ServiceResult<DraftVersion> {
        editor.require_complete_profile()?;
        self.access.require_edit(draft_id, editor.user_id).await?;

        let version = self
            .store
            .create_version(&CreateVersion {
                draft_id,
                content,
                created_by: Some(editor.user_id),
            })
            .await?;

        tracing::info!(
            draft_id,
            user_id = editor.user_id,
            version_number = version.version_number,
            "Version saved"
        );
        self.events.emit(DomainEvent::VersionSaved {
            draft_id,
            version_id: version.id,
            version_number: version.version_number,
            actor_id: editor.user_id,
        });
        Ok(version)
    }

    /// Version history, newest first.
    pub async fn list_versions(
        &self,
        draft_id: DbId,
        user_id: DbId,
    ) -> ServiceResult<Vec<DraftVersion>> {
        self.access.require_edit(draft_id, user_id).await?;
        self.store.list_versions(draft_id).await
    }

    pub async fn get_version(
        &self,
        draft_id: DbId,
        number: VersionNumber,
        user_id: DbId,
    ) -> ServiceResult<DraftVersion> {
        self.access.require_edit(draft_id, user_id).await?;
        self.store
            .find_version_by_number(draft_id, number)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "DraftVersion",
                    id: i64::from(number),
                }
                .into()
            })
    }

    pub async fn latest_version_number(
        &self,
        draft_id: DbId,
        user_id: DbId,
    ) -> ServiceResult<Option<VersionNumber>> {
        self.access.require_edit(draft_id, user_id).await?;
        self.store.latest_version_number(draft_id).await
    }

    /// What a restore to `target` would delete, without committing anything.
    pub async fn preview_restore(
        &self,
        draft_id: DbId,
        target: VersionNumber,
        user_id: DbId,
    ) -> ServiceResult<RestorePlan> {
        validate_version_number(target)?;
        self.access.require_edit(draft_id, user_id).await?;
        let existing = self.store.version_numbers(draft_id).await?;
        Ok(plan_restore(draft_id, &existing, target)?)
    }

    /// Reset live content to version `target` and delete every newer version.
    ///
    /// `expected_deleted_count` is the count the caller confirmed from
    /// [`preview_restore`](Self::preview_restore); a mismatch fails with
    /// `Conflict` and changes nothing.
    pub async fn restore_version(
        &self,
        draft_id: DbId,
        target: VersionNumber,
        editor: &Identity,
        expected_deleted_count: Option<i64>,
    ) -> ServiceResult<RestoreOutcome> {
        validate_version_number(target)?;
        editor.require_complete_profile()?;
        self.access.require_edit(draft_id, editor.user_id).await?;

        let outcome = self
            .store
            .restore_version(draft_id, target, expected_deleted_count)
            .await?;

        tracing::info!(
            draft_id,
            user_id = editor.user_id,
            target_version_number = target,
            deleted_count = outcome.deleted_count,
            "Draft restored, newer versions deleted"
        );
        self.events.emit(DomainEvent::DraftRestored {
            draft_id,
            target_version_number: target,
            deleted_count: outcome.deleted_count,
            actor_id: editor.user_id,
        });
        Ok(outcome)
    }
}
