//! Ownership, collaborator grants and effective access.
//!
//! A draft that does not exist and a draft the caller cannot see look the
//! same from outside: both resolve to [`AccessLevel::None`] and both fail
//! draft-scoped operations with `NotFound`.

use std::sync::Arc;

use inkwell_core::access::{self, AccessLevel};
use inkwell_core::error::CoreError;
use inkwell_core::identity::Identity;
use inkwell_core::types::DbId;
use inkwell_db::models::collaborator::{Collaborator, CollaboratorWithUser, CreateCollaborator};
use inkwell_db::models::draft::Draft;
use inkwell_db::DraftStore;
use inkwell_events::{DomainEvent, EventBus};

use crate::ServiceResult;

#[derive(Clone)]
pub struct AccessControl {
    store: Arc<dyn DraftStore>,
    events: Arc<EventBus>,
}

impl AccessControl {
    pub fn new(store: Arc<dyn DraftStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    pub async fn is_owner(&self, draft_id: DbId, user_id: DbId) -> ServiceResult<bool> {
        Ok(self.effective_access(draft_id, user_id).await?.is_owner())
    }

    /// Whether the user holds an explicit grant. The owner never does.
    pub async fn is_collaborator(&self, draft_id: DbId, user_id: DbId) -> ServiceResult<bool> {
        Ok(self.effective_access(draft_id, user_id).await? == AccessLevel::Collaborator)
    }

    pub async fn effective_access(
        &self,
        draft_id: DbId,
        user_id: DbId,
    ) -> ServiceResult<AccessLevel> {
        match self.store.find_draft(draft_id).await? {
            Some(draft) => self.level_on(&draft, user_id).await,
            None => Ok(AccessLevel::None),
        }
    }

    /// Load a draft with the caller's access level on it.
    ///
    /// A missing draft comes back as `Ok(None)` rather than an error so callers
    /// can pick their own denial.
    pub async fn load(
        &self,
        draft_id: DbId,
        user_id: DbId,
    ) -> ServiceResult<Option<(Draft, AccessLevel)>> {
        match self.store.find_draft(draft_id).await? {
            Some(draft) => {
                let level = self.level_on(&draft, user_id).await?;
                Ok(Some((draft, level)))
            }
            None => Ok(None),
        }
    }

    /// Load a draft the caller can edit, or fail with `NotFound`.
    pub async fn require_edit(&self, draft_id: DbId, user_id: DbId) -> ServiceResult<Draft> {
        let (draft, level) = self
            .load(draft_id, user_id)
            .await?
            .ok_or_else(|| CoreError::draft_not_found(draft_id))?;
        access::require_edit(level, draft_id)?;
        Ok(draft)
    }

    /// Load a draft the caller owns. Collaborators get `Forbidden`, everyone
    /// else `NotFound`.
    pub async fn require_owner(
        &self,
        draft_id: DbId,
        user_id: DbId,
        action: &str,
    ) -> ServiceResult<Draft> {
        let (draft, level) = self
            .load(draft_id, user_id)
            .await?
            .ok_or_else(|| CoreError::draft_not_found(draft_id))?;
        access::require_owner(level, draft_id, action)?;
        Ok(draft)
    }

    async fn level_on(&self, draft: &Draft, user_id: DbId) -> ServiceResult<AccessLevel> {
        if draft.owner_id == user_id {
            return Ok(AccessLevel::Owner);
        }
        let has_grant = self.store.has_grant(draft.id, user_id).await?;
        Ok(access::evaluate(draft.owner_id, user_id, has_grant))
    }

    // -- Collaborator list --

    /// Give `target_user_id` edit access. Owner only.
    pub async fn grant(
        &self,
        draft_id: DbId,
        acting: &Identity,
        target_user_id: DbId,
    ) -> ServiceResult<Collaborator> {
        acting.require_complete_profile()?;
        let draft = self
            .require_owner(draft_id, acting.user_id, "manage collaborators")
            .await?;

        let target = self
            .store
            .find_user(target_user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: target_user_id,
            })?;
        if !target.role.can_author() {
            return Err(CoreError::Validation(
                "Only authors can be added as collaborators".to_string(),
            )
            .into());
        }

        let already_granted = self.store.has_grant(draft.id, target.id).await?;
        access::validate_grant_target(draft.owner_id, target.id, already_granted)?;

        let grant = self
            .store
            .create_grant(&CreateCollaborator {
                draft_id: draft.id,
                user_id: target.id,
                added_by: acting.user_id,
            })
            .await?;

        tracing::info!(
            draft_id,
            user_id = target.id,
            actor_id = acting.user_id,
            "Collaborator added"
        );
        self.events.emit(DomainEvent::CollaboratorAdded {
            draft_id,
            user_id: target.id,
            actor_id: acting.user_id,
        });
        Ok(grant)
    }

    /// Remove a grant by its id. Owner only.
    pub async fn revoke(
        &self,
        draft_id: DbId,
        acting: &Identity,
        grant_id: DbId,
    ) -> ServiceResult<()> {
        acting.require_complete_profile()?;
        self.require_owner(draft_id, acting.user_id, "manage collaborators")
            .await?;

        let not_found = || CoreError::NotFound {
            entity: "Collaborator",
            id: grant_id,
        };
        let grant = self
            .store
            .find_grant(grant_id)
            .await?
            .filter(|g| g.draft_id == draft_id)
            .ok_or_else(not_found)?;

        if !self.store.delete_grant(grant.id).await? {
            return Err(not_found().into());
        }

        tracing::info!(
            draft_id,
            user_id = grant.user_id,
            actor_id = acting.user_id,
            "Collaborator removed"
        );
        self.events.emit(DomainEvent::CollaboratorRemoved {
            draft_id,
            user_id: grant.user_id,
            actor_id: acting.user_id,
        });
        Ok(())
    }

    /// Grants on a draft, visible to anyone who can edit it.
    pub async fn list_collaborators(
        &self,
        draft_id: DbId,
        user_id: DbId,
    ) -> ServiceResult<Vec<CollaboratorWithUser>> {
        self.require_edit(draft_id, user_id).await?;
        self.store.list_grants(draft_id).await
    }
}
