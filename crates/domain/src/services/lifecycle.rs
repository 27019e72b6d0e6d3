//! Lifecycle controller: the single writer of booking state.
//!
//! All transitions between device availability and reservation status go
//! through this service. A device/reservation pair is always updated in one
//! critical section, so readers never observe a reservation without its
//! device marked Occupied, or the reverse.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use shared::validation::clamp_start_time;

use crate::error::BookingError;
use crate::models::{
    CreateReservationRequest, Device, DeviceStatus, FleetStats, RegisterDeviceRequest,
    Reservation, ReservationStatus, UpdateDeviceRequest, UserContext,
};
use crate::services::ledger::ReservationLedger;
use crate::services::registry::DeviceRegistry;
use crate::storage::{BookingStore, StorageError};

struct BookingState {
    registry: DeviceRegistry,
    ledger: ReservationLedger,
}

/// The booking engine.
///
/// Holds the registry and ledger behind one async lock and writes every
/// mutation through to the storage collaborator. Mutating operations take
/// the lock exclusively, which serializes the check-then-act sequences the
/// exclusivity invariant depends on.
pub struct BookingService {
    state: RwLock<BookingState>,
    store: Arc<dyn BookingStore>,
}

impl BookingService {
    /// Hydrates the service from the storage collaborator.
    ///
    /// Device occupancy is a projection of the ledger, so it is recomputed
    /// here: a stale status left behind by an interrupted write is repaired
    /// rather than trusted.
    pub async fn load(store: Arc<dyn BookingStore>) -> Result<Self, BookingError> {
        let mut devices = store.load_devices().await?;
        let reservations = store.load_reservations().await?;
        let ledger = ReservationLedger::new(reservations);

        for device in &mut devices {
            if device.status == DeviceStatus::Maintenance {
                continue;
            }
            match ledger.find_active_by_device(device.id) {
                Some(active) => {
                    if device.status != DeviceStatus::Occupied
                        || device.current_user_name.as_deref() != Some(active.user_name.as_str())
                    {
                        warn!(device_id = %device.id, "Repairing stale device occupancy from ledger");
                        device.status = DeviceStatus::Occupied;
                        device.current_user_name = Some(active.user_name.clone());
                    }
                }
                None => {
                    if device.status != DeviceStatus::Available {
                        warn!(device_id = %device.id, "Releasing device with no active reservation");
                        device.status = DeviceStatus::Available;
                        device.current_user_name = None;
                    }
                }
            }
        }

        info!(
            devices = devices.len(),
            reservations = ledger.list().len(),
            "Booking state loaded"
        );

        Ok(Self {
            state: RwLock::new(BookingState {
                registry: DeviceRegistry::new(devices),
                ledger,
            }),
            store,
        })
    }

    /// Storage connectivity probe for health checks.
    pub async fn ping(&self) -> Result<(), StorageError> {
        self.store.ping().await
    }

    // --- Device registry operations -------------------------------------

    /// Registers a new device; it starts Available.
    pub async fn register_device(
        &self,
        request: RegisterDeviceRequest,
    ) -> Result<Device, BookingError> {
        request.validate()?;

        let now = Utc::now();
        let device = Device {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            location: request.location.trim().to_string(),
            power_watts: request.power_watts,
            max_duration_minutes: request.max_duration_minutes,
            status: DeviceStatus::Available,
            current_user_name: None,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.write().await;
        let registered = device.clone();
        state.registry.register(device)?;

        self.persist_device(&registered).await?;
        info!(device_id = %registered.id, name = %registered.name, "Device registered");
        Ok(registered)
    }

    /// Edits a device's static attributes.
    pub async fn update_device(
        &self,
        device_id: Uuid,
        patch: UpdateDeviceRequest,
    ) -> Result<Device, BookingError> {
        patch.validate()?;

        let mut state = self.state.write().await;
        let updated = state.registry.update(device_id, &patch, Utc::now())?.clone();

        self.persist_device(&updated).await?;
        info!(device_id = %device_id, "Device updated");
        Ok(updated)
    }

    /// Removes a device from the registry.
    ///
    /// Refused while an Active reservation exists; the reservation must be
    /// cancelled first.
    pub async fn remove_device(&self, device_id: Uuid) -> Result<(), BookingError> {
        let mut state = self.state.write().await;
        if state.ledger.find_active_by_device(device_id).is_some() {
            return Err(BookingError::Conflict(format!(
                "Device {} has an active reservation; cancel it before removal",
                device_id
            )));
        }
        state.registry.remove(device_id)?;

        self.store.delete_device(device_id).await?;
        info!(device_id = %device_id, "Device removed");
        Ok(())
    }

    pub async fn get_device(&self, device_id: Uuid) -> Result<Device, BookingError> {
        let state = self.state.read().await;
        state
            .registry
            .get(device_id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("Device {} not found", device_id)))
    }

    /// All devices in insertion order.
    pub async fn list_devices(&self) -> Vec<Device> {
        self.state.read().await.registry.list().to_vec()
    }

    // --- Reservation lifecycle ------------------------------------------

    /// Reserves a device for the calling user.
    ///
    /// A start time in the past is clamped to "now" rather than rejected;
    /// the window always covers the requested number of minutes.
    pub async fn reserve(
        &self,
        device_id: Uuid,
        ctx: &UserContext,
        request: CreateReservationRequest,
    ) -> Result<Reservation, BookingError> {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let device = state
            .registry
            .get(device_id)
            .ok_or_else(|| BookingError::NotFound(format!("Device {} not found", device_id)))?;

        match device.status {
            DeviceStatus::Available => {}
            DeviceStatus::Occupied => {
                return Err(BookingError::InvalidState(format!(
                    "Device {} is occupied",
                    device_id
                )))
            }
            DeviceStatus::Maintenance => {
                return Err(BookingError::InvalidState(format!(
                    "Device {} is under maintenance",
                    device_id
                )))
            }
        }

        if request.duration_minutes < 1 || request.duration_minutes > device.max_duration_minutes {
            return Err(BookingError::Validation(format!(
                "Duration must be between 1 and {} minutes",
                device.max_duration_minutes
            )));
        }

        let start_time = clamp_start_time(request.start_time, now);
        let reservation = Reservation {
            id: Uuid::new_v4(),
            device_id,
            user_id: ctx.user_id.clone(),
            user_name: ctx.display_name.clone(),
            start_time,
            end_time: Reservation::end_of_window(start_time, request.duration_minutes),
            duration_minutes: request.duration_minutes,
            purpose: request.purpose_or_default(),
            status: ReservationStatus::Active,
            created_at: now,
        };

        let created = reservation.clone();
        state.ledger.insert(reservation)?;
        let device = state.registry.get_mut(device_id)?;
        device.occupy(&ctx.display_name, now);
        let occupied = device.clone();

        self.persist_reservation(&created).await?;
        self.persist_device(&occupied).await?;

        info!(
            device_id = %device_id,
            reservation_id = %created.id,
            user_id = %ctx.user_id,
            duration_minutes = created.duration_minutes,
            "Reservation created"
        );
        Ok(created)
    }

    /// Cancels the Active reservation on a device.
    ///
    /// Only the reservation's owner or an admin may cancel. A second cancel
    /// finds no Active reservation and fails NotFound.
    pub async fn cancel(
        &self,
        device_id: Uuid,
        ctx: &UserContext,
    ) -> Result<Reservation, BookingError> {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let active = state
            .ledger
            .find_active_by_device(device_id)
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "No active reservation for device {}",
                    device_id
                ))
            })?;

        if active.user_id != ctx.user_id && !ctx.is_admin() {
            return Err(BookingError::Authorization(
                "Only the reservation owner or an admin may cancel".to_string(),
            ));
        }

        let reservation_id = active.id;
        let cancelled = state
            .ledger
            .set_status(reservation_id, ReservationStatus::Cancelled)?
            .clone();
        let device = state.registry.get_mut(device_id)?;
        device.release(now);
        let released = device.clone();

        self.persist_reservation(&cancelled).await?;
        self.persist_device(&released).await?;

        info!(
            device_id = %device_id,
            reservation_id = %reservation_id,
            cancelled_by = %ctx.user_id,
            "Reservation cancelled"
        );
        Ok(cancelled)
    }

    /// Completes every Active reservation whose window has ended.
    ///
    /// Idempotent: a second sweep at the same instant finds nothing to do.
    /// Returns the reservations completed by this sweep.
    pub async fn expire(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, BookingError> {
        let mut state = self.state.write().await;
        let expired = state.ledger.expired_ids(now);

        let mut completed = Vec::with_capacity(expired.len());
        for reservation_id in expired {
            let done = state
                .ledger
                .set_status(reservation_id, ReservationStatus::Completed)?
                .clone();
            let device = state.registry.get_mut(done.device_id)?;
            device.release(now);
            let released = device.clone();

            self.persist_reservation(&done).await?;
            self.persist_device(&released).await?;
            completed.push(done);
        }

        if !completed.is_empty() {
            info!(count = completed.len(), "Expired reservations completed");
        }
        Ok(completed)
    }

    /// Moves a device in or out of the Maintenance state. Admin only.
    pub async fn set_maintenance(
        &self,
        device_id: Uuid,
        ctx: &UserContext,
        in_maintenance: bool,
    ) -> Result<Device, BookingError> {
        if !ctx.is_admin() {
            return Err(BookingError::Authorization(
                "Only admins may change maintenance state".to_string(),
            ));
        }

        let now = Utc::now();
        let mut state = self.state.write().await;

        let current = state
            .registry
            .get(device_id)
            .ok_or_else(|| BookingError::NotFound(format!("Device {} not found", device_id)))?
            .clone();

        let updated = if in_maintenance {
            if state.ledger.find_active_by_device(device_id).is_some() {
                return Err(BookingError::Conflict(format!(
                    "Device {} has an active reservation; cancel it before maintenance",
                    device_id
                )));
            }
            if current.status == DeviceStatus::Maintenance {
                return Ok(current);
            }
            let device = state.registry.get_mut(device_id)?;
            device.status = DeviceStatus::Maintenance;
            device.current_user_name = None;
            device.updated_at = now;
            device.clone()
        } else {
            if current.status != DeviceStatus::Maintenance {
                return Ok(current);
            }
            let device = state.registry.get_mut(device_id)?;
            device.release(now);
            device.clone()
        };

        self.persist_device(&updated).await?;
        info!(device_id = %device_id, in_maintenance, "Maintenance state changed");
        Ok(updated)
    }

    // --- Read models ----------------------------------------------------

    /// Every reservation the user has taken, any status, oldest first.
    pub async fn reservations_for(&self, user_id: &str) -> Vec<Reservation> {
        let state = self.state.read().await;
        state
            .ledger
            .find_by_user(user_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Fleet occupancy and usage counters.
    pub async fn stats(&self, now: DateTime<Utc>) -> FleetStats {
        let state = self.state.read().await;
        let devices = state.registry.list();
        let today = now.date_naive();

        let todays: Vec<_> = state
            .ledger
            .list()
            .iter()
            .filter(|r| r.created_at.date_naive() == today)
            .collect();
        let average_duration_minutes = if todays.is_empty() {
            0
        } else {
            let total: i32 = todays.iter().map(|r| r.duration_minutes).sum();
            total / todays.len() as i32
        };

        FleetStats {
            total_devices: devices.len(),
            available_devices: devices
                .iter()
                .filter(|d| d.status == DeviceStatus::Available)
                .count(),
            occupied_devices: devices
                .iter()
                .filter(|d| d.status == DeviceStatus::Occupied)
                .count(),
            maintenance_devices: devices
                .iter()
                .filter(|d| d.status == DeviceStatus::Maintenance)
                .count(),
            active_reservations: state
                .ledger
                .list()
                .iter()
                .filter(|r| r.status == ReservationStatus::Active)
                .count(),
            reservations_today: todays.len(),
            average_duration_minutes,
        }
    }

    // --- Write-through helpers ------------------------------------------

    async fn persist_device(&self, device: &Device) -> Result<(), BookingError> {
        self.store.save_device(device).await.map_err(|e| {
            warn!(device_id = %device.id, error = %e, "Device write-through failed");
            BookingError::Storage(e)
        })
    }

    async fn persist_reservation(&self, reservation: &Reservation) -> Result<(), BookingError> {
        self.store.save_reservation(reservation).await.map_err(|e| {
            warn!(reservation_id = %reservation.id, error = %e, "Reservation write-through failed");
            BookingError::Storage(e)
        })
    }
}
