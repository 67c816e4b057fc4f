//! Durable event persistence service.
//!
//! [`EventPersistence`] drains an [`EventBus`](crate::bus::EventBus)
//! subscription into the `events` table. It runs as a long-lived background
//! task and exits when the bus is dropped.

use inkwell_core::types::DbId;
use inkwell_db::repositories::EventRepo;
use inkwell_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

pub struct EventPersistence;

impl EventPersistence {
    /// Persist every event received on `receiver` until the channel closes.
    ///
    /// Write failures are logged and skipped; they never stop the loop.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Log events instead of storing them. Used when no database is configured.
    pub async fn run_log_only(mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => tracing::info!(
                    event_type = %event.event_type,
                    entity_type = event.source_entity_type.as_deref().unwrap_or("-"),
                    entity_id = event.source_entity_id,
                    actor_user_id = event.actor_user_id,
                    "Domain event"
                ),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event log lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        EventRepo::insert(
            pool,
            &event.event_type,
            event.source_entity_type.as_deref(),
            event.source_entity_id,
            event.actor_user_id,
            &event.payload,
        )
        .await
    }
}
