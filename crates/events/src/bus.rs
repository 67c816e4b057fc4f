//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Publishing never blocks and never fails: a notifier that is slow or absent
//! cannot hold up a review decision. Shared as `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use inkwell_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::DomainEvent;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// Envelope for an event as it travels over the bus and into storage.
///
/// Usually produced from a [`DomainEvent`]; the builder methods exist for
/// ad-hoc events and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"submission.status_changed"`.
    pub event_type: String,

    /// Kind of entity the event is about (`"draft"`, `"submission"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// User whose request caused the event.
    pub actor_user_id: Option<DbId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Create an event with an empty payload and no source or actor.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out bus: every subscriber sees every event published after it
/// subscribed.
///
/// ```rust
/// use inkwell_events::{DomainEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.emit(DomainEvent::CollaboratorRemoved { draft_id: 4, user_id: 9, actor_id: 1 });
/// assert_eq!(rx.try_recv().unwrap().event_type, "collaborator.removed");
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an envelope to all current subscribers.
    pub fn publish(&self, event: PlatformEvent) {
        // A send error only means there are no receivers right now.
        let _ = self.sender.send(event);
    }

    /// Publish a typed domain event.
    pub fn emit(&self, event: DomainEvent) {
        tracing::debug!(event_type = event.event_type(), "Emitting domain event");
        self.publish(event.into());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
