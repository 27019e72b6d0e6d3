//! Abstract storage port for the booking state.
//!
//! The lifecycle controller depends only on these operations, never on a
//! concrete storage technology. Implementations live in the persistence
//! crate.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Device, Reservation};

/// Failure reported by a storage implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StorageError(pub String);

/// Durable storage collaborator for devices and reservations.
///
/// `load_*` return records in insertion order; `save_*` upsert by id.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn load_devices(&self) -> Result<Vec<Device>, StorageError>;

    async fn save_device(&self, device: &Device) -> Result<(), StorageError>;

    async fn delete_device(&self, id: Uuid) -> Result<(), StorageError>;

    async fn load_reservations(&self) -> Result<Vec<Reservation>, StorageError>;

    async fn save_reservation(&self, reservation: &Reservation) -> Result<(), StorageError>;

    /// Cheap connectivity probe used by health checks.
    async fn ping(&self) -> Result<(), StorageError>;
}
