// Dashboard counters.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::server::AppState;
use crate::store::Stats;

/// GET /admin-api/stats
pub async fn overview(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    Ok(Json(state.store.stats().await?))
}
