//! Typed domain events emitted by the workflow services.
//!
//! Each variant flattens into a [`PlatformEvent`] with a stable dot-separated
//! `event_type`, a source entity, the acting user, and a JSON payload.

use inkwell_core::submission::SubmissionStatus;
use inkwell_core::types::{DbId, VersionNumber};
use serde_json::json;

use crate::bus::PlatformEvent;

pub const EVENT_DRAFT_CREATED: &str = "draft.created";
pub const EVENT_VERSION_SAVED: &str = "version.saved";
pub const EVENT_DRAFT_RESTORED: &str = "draft.restored";
pub const EVENT_COLLABORATOR_ADDED: &str = "collaborator.added";
pub const EVENT_COLLABORATOR_REMOVED: &str = "collaborator.removed";
pub const EVENT_SUBMISSION_CREATED: &str = "submission.created";
pub const EVENT_SUBMISSION_STATUS_CHANGED: &str = "submission.status_changed";

const ENTITY_DRAFT: &str = "draft";
const ENTITY_SUBMISSION: &str = "submission";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    DraftCreated {
        draft_id: DbId,
        owner_id: DbId,
    },
    VersionSaved {
        draft_id: DbId,
        version_id: DbId,
        version_number: VersionNumber,
        actor_id: DbId,
    },
    DraftRestored {
        draft_id: DbId,
        target_version_number: VersionNumber,
        deleted_count: i64,
        actor_id: DbId,
    },
    CollaboratorAdded {
        draft_id: DbId,
        user_id: DbId,
        actor_id: DbId,
    },
    CollaboratorRemoved {
        draft_id: DbId,
        user_id: DbId,
        actor_id: DbId,
    },
    SubmissionCreated {
        submission_id: DbId,
        draft_id: DbId,
        version_id: Option<DbId>,
        actor_id: DbId,
    },
    /// A reviewer approved or rejected a submission. Drives user-facing
    /// notifications.
    SubmissionStatusChanged {
        submission_id: DbId,
        draft_id: DbId,
        old_status: SubmissionStatus,
        new_status: SubmissionStatus,
        actor_id: DbId,
    },
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::DraftCreated { .. } => EVENT_DRAFT_CREATED,
            DomainEvent::VersionSaved { .. } => EVENT_VERSION_SAVED,
            DomainEvent::DraftRestored { .. } => EVENT_DRAFT_RESTORED,
            DomainEvent::CollaboratorAdded { .. } => EVENT_COLLABORATOR_ADDED,
            DomainEvent::CollaboratorRemoved { .. } => EVENT_COLLABORATOR_REMOVED,
            DomainEvent::SubmissionCreated { .. } => EVENT_SUBMISSION_CREATED,
            DomainEvent::SubmissionStatusChanged { .. } => EVENT_SUBMISSION_STATUS_CHANGED,
        }
    }
}

impl From<DomainEvent> for PlatformEvent {
    fn from(event: DomainEvent) -> Self {
        let base = PlatformEvent::new(event.event_type());
        match event {
            DomainEvent::DraftCreated { draft_id, owner_id } => base
                .with_source(ENTITY_DRAFT, draft_id)
                .with_actor(owner_id),
            DomainEvent::VersionSaved {
                draft_id,
                version_id,
                version_number,
                actor_id,
            } => base
                .with_source(ENTITY_DRAFT, draft_id)
                .with_actor(actor_id)
                .with_payload(json!({
                    "version_id": version_id,
                    "version_number": version_number,
                })),
            DomainEvent::DraftRestored {
                draft_id,
                target_version_number,
                deleted_count,
                actor_id,
            } => base
                .with_source(ENTITY_DRAFT, draft_id)
                .with_actor(actor_id)
                .with_payload(json!({
                    "target_version_number": target_version_number,
                    "deleted_count": deleted_count,
                })),
            DomainEvent::CollaboratorAdded {
                draft_id,
                user_id,
                actor_id,
            }
            | DomainEvent::CollaboratorRemoved {
                draft_id,
                user_id,
                actor_id,
            } => base
                .with_source(ENTITY_DRAFT, draft_id)
                .with_actor(actor_id)
                .with_payload(json!({ "user_id": user_id })),
            DomainEvent::SubmissionCreated {
                submission_id,
                draft_id,
                version_id,
                actor_id,
            } => base
                .with_source(ENTITY_SUBMISSION, submission_id)
                .with_actor(actor_id)
                .with_payload(json!({
                    "draft_id": draft_id,
                    "version_id": version_id,
                })),
            DomainEvent::SubmissionStatusChanged {
                submission_id,
                draft_id,
                old_status,
                new_status,
                actor_id,
            } => base
                .with_source(ENTITY_SUBMISSION, submission_id)
                .with_actor(actor_id)
                .with_payload(json!({
                    "draft_id": draft_id,
                    "old_status": old_status,
                    "new_status": new_status,
                })),
        }
    }
}
