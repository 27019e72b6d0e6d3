//! Reservation endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Identity;
use domain::models::{CreateReservationRequest, Reservation};

const MAX_PER_PAGE: i64 = 100;

/// Pagination info for list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Response for the caller's reservation history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListReservationsResponse {
    pub data: Vec<Reservation>,
    pub pagination: Pagination,
}

/// Query parameters for listing reservations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListReservationsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Reserve a device for the calling user.
///
/// POST /api/v1/devices/:device_id/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    Identity(ctx): Identity,
    Path(device_id): Path<Uuid>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let reservation = state.service.reserve(device_id, &ctx, request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Cancel the active reservation on a device.
///
/// Owners cancel their own; admins may cancel anyone's.
///
/// DELETE /api/v1/devices/:device_id/reservation
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Identity(ctx): Identity,
    Path(device_id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
    let cancelled = state.service.cancel(device_id, &ctx).await?;
    Ok(Json(cancelled))
}

/// List the calling user's reservations, any status, oldest first.
///
/// GET /api/v1/reservations
pub async fn list_my_reservations(
    State(state): State<AppState>,
    Identity(ctx): Identity,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<ListReservationsResponse>, ApiError> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, MAX_PER_PAGE);

    let all = state.service.reservations_for(&ctx.user_id).await;
    let total = all.len() as i64;

    let offset = ((page - 1) * per_page) as usize;
    let data = all
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    Ok(Json(ListReservationsResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    }))
}
