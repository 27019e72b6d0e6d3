//! In-memory implementation of the storage port.
//!
//! Used by tests and by the `memory` database driver for local runs that
//! should not need a PostgreSQL instance.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domain::models::{Device, DeviceStatus, Reservation};
use domain::{BookingStore, StorageError};

#[derive(Default)]
struct Inner {
    devices: Vec<Device>,
    reservations: Vec<Reservation>,
}

/// Storage port backed by process memory. Insertion order is the vector
/// order, matching what the serial column gives the PostgreSQL store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the demo fleet, for local runs.
    pub fn with_sample_fleet() -> Self {
        let fleet = [
            ("Kitchen Microwave A", "Main Kitchen - Floor 1", 1000, 30),
            ("Break Room Microwave", "Break Room - Floor 2", 800, 25),
            ("Cafeteria Microwave 1", "Cafeteria - Ground Floor", 1200, 35),
            ("Cafeteria Microwave 2", "Cafeteria - Ground Floor", 1200, 35),
            ("Executive Floor Microwave", "Executive Lounge - Floor 5", 900, 20),
            ("Lab Microwave", "Research Lab - Floor 3", 700, 15),
        ];

        let now = Utc::now();
        let devices = fleet
            .into_iter()
            .map(|(name, location, power_watts, max_duration_minutes)| Device {
                id: Uuid::new_v4(),
                name: name.to_string(),
                location: location.to_string(),
                power_watts,
                max_duration_minutes,
                status: DeviceStatus::Available,
                current_user_name: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            inner: Mutex::new(Inner {
                devices,
                reservations: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn load_devices(&self) -> Result<Vec<Device>, StorageError> {
        Ok(self.lock()?.devices.clone())
    }

    async fn save_device(&self, device: &Device) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        match inner.devices.iter_mut().find(|d| d.id == device.id) {
            Some(existing) => *existing = device.clone(),
            None => inner.devices.push(device.clone()),
        }
        Ok(())
    }

    async fn delete_device(&self, id: Uuid) -> Result<(), StorageError> {
        self.lock()?.devices.retain(|d| d.id != id);
        Ok(())
    }

    async fn load_reservations(&self) -> Result<Vec<Reservation>, StorageError> {
        Ok(self.lock()?.reservations.clone())
    }

    async fn save_reservation(&self, reservation: &Reservation) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        match inner
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation.id)
        {
            Some(existing) => *existing = reservation.clone(),
            None => inner.reservations.push(reservation.clone()),
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::ReservationStatus;

    fn device(name: &str) -> Device {
        let now = Utc::now();
        Device {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location: "Break Room - Floor 2".to_string(),
            power_watts: 800,
            max_duration_minutes: 25,
            status: DeviceStatus::Available,
            current_user_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_devices_in_order() {
        let store = MemoryStore::new();
        let first = device("First");
        let second = device("Second");
        store.save_device(&first).await.unwrap();
        store.save_device(&second).await.unwrap();

        let loaded = store.load_devices().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "First");
        assert_eq!(loaded[1].name, "Second");
    }

    #[tokio::test]
    async fn test_save_device_upserts() {
        let store = MemoryStore::new();
        let mut d = device("Original");
        store.save_device(&d).await.unwrap();

        d.name = "Renamed".to_string();
        store.save_device(&d).await.unwrap();

        let loaded = store.load_devices().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_device() {
        let store = MemoryStore::new();
        let d = device("Doomed");
        let id = d.id;
        store.save_device(&d).await.unwrap();
        store.delete_device(id).await.unwrap();
        assert!(store.load_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_reservation_upserts_status() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut r = Reservation {
            id: Uuid::new_v4(),
            device_id: Uuid::new_v4(),
            user_id: "sarah@company.com".to_string(),
            user_name: "Sarah Wilson".to_string(),
            start_time: now,
            end_time: now + chrono::Duration::minutes(10),
            duration_minutes: 10,
            purpose: "Heating lunch".to_string(),
            status: ReservationStatus::Active,
            created_at: now,
        };
        store.save_reservation(&r).await.unwrap();

        r.status = ReservationStatus::Cancelled;
        store.save_reservation(&r).await.unwrap();

        let loaded = store.load_reservations().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_sample_fleet() {
        let store = MemoryStore::with_sample_fleet();
        let devices = store.load_devices().await.unwrap();
        assert_eq!(devices.len(), 6);
        assert!(devices.iter().all(|d| d.status == DeviceStatus::Available));
        assert!(devices
            .iter()
            .all(|d| (1..=60).contains(&d.max_duration_minutes)));
    }
}
