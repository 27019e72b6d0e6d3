//! Fleet statistics endpoint handler.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::app::AppState;
use crate::extractors::Identity;
use domain::models::FleetStats;

/// Fleet occupancy and usage counters.
///
/// GET /api/v1/stats
pub async fn get_stats(State(state): State<AppState>, _identity: Identity) -> Json<FleetStats> {
    Json(state.service.stats(Utc::now()).await)
}
