//! Route definitions for `/drafts` and everything scoped to one draft.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{collaborators, drafts, submissions, versions};
use crate::state::AppState;

/// Routes mounted at `/drafts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(drafts::list_owned).post(drafts::create))
        .route("/shared", get(drafts::list_shared))
        .route("/{id}", get(drafts::get_by_id).patch(drafts::update))
        .route("/{id}/access", get(drafts::get_access))
        .route("/{id}/versions", get(versions::list).post(versions::create))
        .route("/{id}/versions/latest", get(versions::latest))
        .route("/{id}/versions/{n}", get(versions::get_by_number))
        .route(
            "/{id}/versions/{n}/restore",
            get(versions::preview_restore).post(versions::restore),
        )
        .route(
            "/{id}/collaborators",
            get(collaborators::list).post(collaborators::grant),
        )
        .route(
            "/{id}/collaborators/{grant_id}",
            delete(collaborators::revoke),
        )
        .route(
            "/{id}/submissions",
            get(submissions::list_for_draft).post(submissions::submit),
        )
}
