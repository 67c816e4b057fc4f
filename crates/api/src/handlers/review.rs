//! Reviewer dashboard.

use axum::extract::State;
use axum::Json;
use inkwell_db::models::submission::ReviewStats;

use crate::error::AppResult;
use crate::middleware::rbac::RequireReviewer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/review/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireReviewer(user): RequireReviewer,
) -> AppResult<Json<DataResponse<ReviewStats>>> {
    let stats = state.workflow.submissions.stats(&user.identity).await?;
    Ok(Json(DataResponse { data: stats }))
}
