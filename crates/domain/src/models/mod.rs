//! Domain models for the booking backend.

pub mod device;
pub mod reservation;
pub mod stats;
pub mod user;

pub use device::{Device, DeviceStatus, RegisterDeviceRequest, UpdateDeviceRequest};
pub use reservation::{
    CreateReservationRequest, Reservation, ReservationStatus, DEFAULT_DURATION_MINUTES,
    DEFAULT_PURPOSE,
};
pub use stats::FleetStats;
pub use user::{UserContext, UserRole};
