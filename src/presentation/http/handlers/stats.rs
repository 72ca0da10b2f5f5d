//! Stats Handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::domain::{StatsFilter, StatsSnapshot};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// GET /api/stats?country=&page=
pub async fn get_stats(
    State(state): State<AppState>,
    query: Result<Query<StatsFilter>, QueryRejection>,
) -> Result<Json<StatsSnapshot>, AppError> {
    let Query(filter) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(state.stats.detailed_stats(&filter)))
}
