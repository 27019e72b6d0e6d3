//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod device;
pub mod reservation;

pub use device::DeviceEntity;
pub use reservation::ReservationEntity;
