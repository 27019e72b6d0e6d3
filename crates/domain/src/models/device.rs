//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_max_duration, validate_not_blank, validate_power_watts};

/// Availability state of a device.
///
/// `Maintenance` is an administrative state that blocks new reservations
/// regardless of occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Available,
    Occupied,
    Maintenance,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Available => write!(f, "available"),
            DeviceStatus::Occupied => write!(f, "occupied"),
            DeviceStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl std::str::FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(DeviceStatus::Available),
            "occupied" => Ok(DeviceStatus::Occupied),
            "maintenance" => Ok(DeviceStatus::Maintenance),
            other => Err(format!("Unknown device status: {}", other)),
        }
    }
}

/// A bookable microwave oven.
///
/// `status` and `current_user_name` mirror the reservation ledger: a device
/// is `Occupied` exactly when an Active reservation exists for it, and
/// `current_user_name` carries that reservation's user display name. Both
/// fields are written only by the lifecycle controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub power_watts: i32,
    pub max_duration_minutes: i32,
    pub status: DeviceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Marks the device occupied by the named user.
    pub(crate) fn occupy(&mut self, user_name: &str, now: DateTime<Utc>) {
        self.status = DeviceStatus::Occupied;
        self.current_user_name = Some(user_name.to_string());
        self.updated_at = now;
    }

    /// Returns the device to the available pool.
    pub(crate) fn release(&mut self, now: DateTime<Utc>) {
        self.status = DeviceStatus::Available;
        self.current_user_name = None;
        self.updated_at = now;
    }
}

/// Request payload for registering a new device.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: String,

    #[serde(default = "default_power_watts")]
    #[validate(custom(function = "validate_power_watts"))]
    pub power_watts: i32,

    #[serde(default = "default_max_duration_minutes")]
    #[validate(custom(function = "validate_max_duration"))]
    pub max_duration_minutes: i32,
}

/// Request payload for editing an existing device.
///
/// Only the supplied fields change; omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    #[validate(custom(function = "validate_power_watts"))]
    pub power_watts: Option<i32>,

    #[validate(custom(function = "validate_max_duration"))]
    pub max_duration_minutes: Option<i32>,
}

fn default_power_watts() -> i32 {
    1000
}

fn default_max_duration_minutes() -> i32 {
    30
}
