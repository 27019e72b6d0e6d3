//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Minimum rated power for a registered device, in watts.
pub const MIN_POWER_WATTS: i32 = 100;

/// Maximum rated power for a registered device, in watts.
pub const MAX_POWER_WATTS: i32 = 2000;

/// Minimum per-device reservation limit, in minutes.
pub const MIN_DURATION_MINUTES: i32 = 1;

/// Maximum per-device reservation limit, in minutes.
pub const MAX_DURATION_MINUTES: i32 = 60;

/// Validates that a power rating is within the supported range (100 to 2000 W).
pub fn validate_power_watts(watts: i32) -> Result<(), ValidationError> {
    if (MIN_POWER_WATTS..=MAX_POWER_WATTS).contains(&watts) {
        Ok(())
    } else {
        let mut err = ValidationError::new("power_range");
        err.message = Some("Power must be between 100 and 2000 watts".into());
        Err(err)
    }
}

/// Validates that a per-device duration limit is within range (1 to 60 minutes).
pub fn validate_max_duration(minutes: i32) -> Result<(), ValidationError> {
    if (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        let mut err = ValidationError::new("max_duration_range");
        err.message = Some("Maximum duration must be between 1 and 60 minutes".into());
        Err(err)
    }
}

/// Validates that a descriptive field is non-empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Clamps a requested start time to `now` when it lies in the past.
///
/// Late or stale start times are accepted rather than rejected; the
/// reservation simply begins immediately.
pub fn clamp_start_time(requested: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match requested {
        Some(start) if start > now => start,
        _ => now,
    }
}
