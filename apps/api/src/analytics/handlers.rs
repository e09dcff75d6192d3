use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::analytics::DEFAULT_STATS_LIMIT;
use crate::errors::AppError;
use crate::models::analytics::AnalyticsStats;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub limit: Option<usize>,
}

/// GET /api/analytics?limit=N
///
/// Aggregates over the most recent `limit` events (default 100).
pub async fn handle_get_analytics(
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<AnalyticsStats>, AppError> {
    let Query(params) = query.map_err(|_| {
        AppError::Validation("limit must be a non-negative integer".to_string())
    })?;
    let limit = params.limit.unwrap_or(DEFAULT_STATS_LIMIT);
    Ok(Json(state.analytics.stats(limit).await))
}
