//! Fleet statistics read model.

use serde::Serialize;

/// Snapshot of fleet occupancy and usage, as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total_devices: usize,
    pub available_devices: usize,
    pub occupied_devices: usize,
    pub maintenance_devices: usize,
    pub active_reservations: usize,
    pub reservations_today: usize,
    /// Mean duration of today's reservations in minutes, zero when none.
    pub average_duration_minutes: i32,
}
