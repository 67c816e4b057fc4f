use axum::routing::get;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Routes mounted at `/review`.
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(review::stats))
}
