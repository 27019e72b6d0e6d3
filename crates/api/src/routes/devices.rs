//! Device endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminIdentity, Identity};
use domain::models::{Device, RegisterDeviceRequest, UpdateDeviceRequest};

/// Response for device listing.
#[derive(Debug, Serialize)]
pub struct ListDevicesResponse {
    pub devices: Vec<Device>,
}

/// Request body for the maintenance toggle.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMaintenanceRequest {
    pub in_maintenance: bool,
}

/// List all devices with live status.
///
/// GET /api/v1/devices
pub async fn list_devices(
    State(state): State<AppState>,
    _identity: Identity,
) -> Json<ListDevicesResponse> {
    let devices = state.service.list_devices().await;
    Json(ListDevicesResponse { devices })
}

/// Fetch a single device.
///
/// GET /api/v1/devices/:device_id
pub async fn get_device(
    State(state): State<AppState>,
    _identity: Identity,
    Path(device_id): Path<Uuid>,
) -> Result<Json<Device>, ApiError> {
    let device = state.service.get_device(device_id).await?;
    Ok(Json(device))
}

/// Register a new device.
///
/// POST /api/v1/admin/devices
pub async fn register_device(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Json(request): Json<RegisterDeviceRequest>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let device = state.service.register_device(request).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// Edit a device's static attributes.
///
/// PUT /api/v1/admin/devices/:device_id
pub async fn update_device(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(device_id): Path<Uuid>,
    Json(patch): Json<UpdateDeviceRequest>,
) -> Result<Json<Device>, ApiError> {
    let device = state.service.update_device(device_id, patch).await?;
    Ok(Json(device))
}

/// Remove a device from the registry.
///
/// DELETE /api/v1/admin/devices/:device_id
pub async fn remove_device(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(device_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.remove_device(device_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a device in or out of maintenance.
///
/// PUT /api/v1/admin/devices/:device_id/maintenance
pub async fn set_maintenance(
    State(state): State<AppState>,
    AdminIdentity(ctx): AdminIdentity,
    Path(device_id): Path<Uuid>,
    Json(request): Json<SetMaintenanceRequest>,
) -> Result<Json<Device>, ApiError> {
    let device = state
        .service
        .set_maintenance(device_id, &ctx, request.in_maintenance)
        .await?;
    Ok(Json(device))
}
