//! Domain services for the booking backend.
//!
//! The registry and ledger hold the two halves of booking state; the
//! lifecycle controller is the only writer that touches both.

pub mod ledger;
pub mod lifecycle;
pub mod registry;

pub use ledger::ReservationLedger;
pub use lifecycle::BookingService;
pub use registry::DeviceRegistry;
