//! PostgreSQL implementation of the storage port.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Device, Reservation};
use domain::{BookingStore, StorageError};

use crate::entities::{DeviceEntity, ReservationEntity};

/// Storage port backed by a PostgreSQL pool.
///
/// Rows carry a serial `seq` column so loads come back in insertion order.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn storage_err(err: sqlx::Error) -> StorageError {
    StorageError(format!("database error: {}", err))
}

#[async_trait]
impl BookingStore for PgStore {
    async fn load_devices(&self) -> Result<Vec<Device>, StorageError> {
        let rows = sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, name, location, power_watts, max_duration_minutes,
                   status, current_user_name, created_at, updated_at
            FROM devices
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(Device::try_from).collect()
    }

    async fn save_device(&self, device: &Device) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO devices (id, name, location, power_watts, max_duration_minutes,
                                 status, current_user_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                location = EXCLUDED.location,
                power_watts = EXCLUDED.power_watts,
                max_duration_minutes = EXCLUDED.max_duration_minutes,
                status = EXCLUDED.status,
                current_user_name = EXCLUDED.current_user_name,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(device.id)
        .bind(&device.name)
        .bind(&device.location)
        .bind(device.power_watts)
        .bind(device.max_duration_minutes)
        .bind(device.status.to_string())
        .bind(&device.current_user_name)
        .bind(device.created_at)
        .bind(device.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn delete_device(&self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn load_reservations(&self) -> Result<Vec<Reservation>, StorageError> {
        let rows = sqlx::query_as::<_, ReservationEntity>(
            r#"
            SELECT id, device_id, user_id, user_name, start_time, end_time,
                   duration_minutes, purpose, status, created_at
            FROM reservations
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn save_reservation(&self, reservation: &Reservation) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO reservations (id, device_id, user_id, user_name, start_time,
                                      end_time, duration_minutes, purpose, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.device_id)
        .bind(&reservation.user_id)
        .bind(&reservation.user_name)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.duration_minutes)
        .bind(&reservation.purpose)
        .bind(reservation.status.to_string())
        .bind(reservation.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }
}
