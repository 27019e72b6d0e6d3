//! Reservation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Reservation;
use domain::StorageError;

/// Database row mapping for the reservations table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationEntity {
    pub id: Uuid,
    pub device_id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub purpose: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReservationEntity> for Reservation {
    type Error = StorageError;

    fn try_from(entity: ReservationEntity) -> Result<Self, Self::Error> {
        let status = entity
            .status
            .parse()
            .map_err(|e: String| StorageError(e))?;
        Ok(Self {
            id: entity.id,
            device_id: entity.device_id,
            user_id: entity.user_id,
            user_name: entity.user_name,
            start_time: entity.start_time,
            end_time: entity.end_time,
            duration_minutes: entity.duration_minutes,
            purpose: entity.purpose,
            status,
            created_at: entity.created_at,
        })
    }
}
