//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Device;
use domain::StorageError;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub power_watts: i32,
    pub max_duration_minutes: i32,
    pub status: String,
    pub current_user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DeviceEntity> for Device {
    type Error = StorageError;

    fn try_from(entity: DeviceEntity) -> Result<Self, Self::Error> {
        let status = entity
            .status
            .parse()
            .map_err(|e: String| StorageError(e))?;
        Ok(Self {
            id: entity.id,
            name: entity.name,
            location: entity.location,
            power_watts: entity.power_watts,
            max_duration_minutes: entity.max_duration_minutes,
            status,
            current_user_name: entity.current_user_name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
