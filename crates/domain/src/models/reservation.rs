//! Reservation domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Purpose recorded when the requester leaves the field empty.
pub const DEFAULT_PURPOSE: &str = "Heating food";

/// Duration applied when the requester does not pick one.
pub const DEFAULT_DURATION_MINUTES: i32 = 5;

/// Status of a reservation.
///
/// `Active` is the only non-terminal state; a reservation leaves it exactly
/// once, to `Cancelled` (user- or admin-initiated) or `Completed` (expiry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    /// Whether a direct transition to `next` is legal.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Active, ReservationStatus::Cancelled)
                | (ReservationStatus::Active, ReservationStatus::Completed)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Active => write!(f, "active"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
            ReservationStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ReservationStatus::Active),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "completed" => Ok(ReservationStatus::Completed),
            other => Err(format!("Unknown reservation status: {}", other)),
        }
    }
}

/// A time-bounded, exclusive claim by one user on one device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub device_id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub purpose: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether this reservation is past its end time at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }

    /// Computes the end time for a window starting at `start`.
    pub fn end_of_window(start: DateTime<Utc>, duration_minutes: i32) -> DateTime<Utc> {
        start + Duration::minutes(i64::from(duration_minutes))
    }
}

/// Request payload for creating a reservation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Requested start; past or missing values are clamped to "now".
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default = "default_duration")]
    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    pub duration_minutes: i32,

    #[serde(default)]
    pub purpose: Option<String>,
}

impl CreateReservationRequest {
    /// Recorded purpose: the trimmed free text, or the fixed placeholder.
    pub fn purpose_or_default(&self) -> String {
        match self.purpose.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => DEFAULT_PURPOSE.to_string(),
        }
    }
}

fn default_duration() -> i32 {
    DEFAULT_DURATION_MINUTES
}
