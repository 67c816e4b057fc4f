pub mod auth;
pub mod drafts;
pub mod health;
pub mod me;
pub mod review;
pub mod sessions;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                              register (public)
/// /auth/login                                 login (public)
///
/// /me                                         current identity
/// /me/profile                                 onboarding (PUT)
///
/// /drafts                                     list owned, create
/// /drafts/shared                              drafts shared with the caller
/// /drafts/{id}                                get, update (PATCH)
/// /drafts/{id}/access                         caller's effective access
/// /drafts/{id}/versions                       list, checkpoint
/// /drafts/{id}/versions/latest                latest version number
/// /drafts/{id}/versions/{n}                   get one version
/// /drafts/{id}/versions/{n}/restore           preview (GET), restore (POST)
/// /drafts/{id}/collaborators                  list, grant
/// /drafts/{id}/collaborators/{grant_id}       revoke (DELETE)
/// /drafts/{id}/submissions                    history, submit
///
/// /submissions/pending                        review queue (reviewer)
/// /submissions/{id}                           detail
/// /submissions/{id}/approve                   approve (reviewer)
/// /submissions/{id}/reject                    reject (reviewer)
///
/// /review/stats                               dashboard counters (reviewer)
///
/// /sessions/authorize                         real-time room grant
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/me", me::router())
        .nest("/drafts", drafts::router())
        .nest("/submissions", submissions::router())
        .nest("/review", review::router())
        .nest("/sessions", sessions::router())
}
