use std::sync::Arc;

use inkwell_db::DraftStore;
use inkwell_events::EventBus;
use inkwell_workflow::Workflow;

use crate::auth::jwt::JwtAuthProvider;
use crate::auth::session_token::JwtSessionTransport;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Backing store (Postgres or in-memory).
    pub store: Arc<dyn DraftStore>,
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for domain events.
    pub event_bus: Arc<EventBus>,
    /// Workflow services wired to `store` and `event_bus`.
    pub workflow: Arc<Workflow>,
}

impl AppState {
    /// Wire the workflow services with the JWT auth provider and the signed
    /// session transport from `config`.
    pub fn new(store: Arc<dyn DraftStore>, config: ServerConfig, event_bus: Arc<EventBus>) -> Self {
        let workflow = Workflow::new(
            Arc::clone(&store),
            Arc::clone(&event_bus),
            Arc::new(JwtAuthProvider::new(config.jwt.clone())),
            Arc::new(JwtSessionTransport::new(&config.session)),
            config.session.ttl_secs,
        );
        Self {
            store,
            config: Arc::new(config),
            event_bus,
            workflow: Arc::new(workflow),
        }
    }
}
