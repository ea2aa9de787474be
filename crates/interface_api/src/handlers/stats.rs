//! Statistics handlers

use axum::{extract::State, Json};

use crate::dto::stats::StatsResponse;
use crate::{error::ApiError, AppState};

/// Counters for the dashboard, recomputed on every call
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    Ok(Json(state.service.statistics().await?.into()))
}
