use axum::routing::{get, post};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(submissions::list_pending))
        .route("/{id}", get(submissions::get_by_id))
        .route("/{id}/approve", post(submissions::approve))
        .route("/{id}/reject", post(submissions::reject))
}
