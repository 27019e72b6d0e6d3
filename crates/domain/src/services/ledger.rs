//! Reservation ledger: every reservation ever taken, active or past.

use uuid::Uuid;

use crate::error::BookingError;
use crate::models::{Reservation, ReservationStatus};

/// Append-only ledger of reservations in insertion order.
///
/// The ledger enforces the exclusivity invariant (at most one Active
/// reservation per device) and the legal status transitions. It never
/// touches device state; the lifecycle controller keeps the two in step.
#[derive(Debug, Default)]
pub struct ReservationLedger {
    reservations: Vec<Reservation>,
}

impl ReservationLedger {
    /// Builds a ledger from previously persisted reservations.
    pub fn new(reservations: Vec<Reservation>) -> Self {
        Self { reservations }
    }

    /// Appends a new Active reservation.
    ///
    /// Fails with `Conflict` if the device already has an Active
    /// reservation, which is what makes the exclusivity invariant hold.
    pub fn insert(&mut self, reservation: Reservation) -> Result<(), BookingError> {
        if reservation.status != ReservationStatus::Active {
            return Err(BookingError::Validation(
                "New reservations must be created Active".to_string(),
            ));
        }
        if self.reservations.iter().any(|r| r.id == reservation.id) {
            return Err(BookingError::Conflict(format!(
                "Reservation {} already exists",
                reservation.id
            )));
        }
        if let Some(existing) = self.find_active_by_device(reservation.device_id) {
            return Err(BookingError::Conflict(format!(
                "Device {} already has an active reservation ({})",
                reservation.device_id, existing.id
            )));
        }

        self.reservations.push(reservation);
        Ok(())
    }

    /// The Active reservation for a device, if any.
    pub fn find_active_by_device(&self, device_id: Uuid) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|r| r.device_id == device_id && r.status == ReservationStatus::Active)
    }

    /// All reservations for a user, any status, insertion order.
    pub fn find_by_user(&self, user_id: &str) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .collect()
    }

    pub fn get(&self, reservation_id: Uuid) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == reservation_id)
    }

    /// Transitions a reservation's status.
    ///
    /// Only Active→Cancelled and Active→Completed are legal.
    pub fn set_status(
        &mut self,
        reservation_id: Uuid,
        new_status: ReservationStatus,
    ) -> Result<&Reservation, BookingError> {
        let reservation = self
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .ok_or_else(|| {
                BookingError::NotFound(format!("Reservation {} not found", reservation_id))
            })?;

        if !reservation.status.can_transition_to(new_status) {
            return Err(BookingError::InvalidTransition(format!(
                "Cannot transition reservation {} from {} to {}",
                reservation_id, reservation.status, new_status
            )));
        }

        reservation.status = new_status;
        Ok(reservation)
    }

    /// Ids of Active reservations whose window has ended at `now`.
    pub fn expired_ids(&self, now: chrono::DateTime<chrono::Utc>) -> Vec<Uuid> {
        self.reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Active && r.is_expired(now))
            .map(|r| r.id)
            .collect()
    }

    /// All reservations in insertion order.
    pub fn list(&self) -> &[Reservation] {
        &self.reservations
    }
}
