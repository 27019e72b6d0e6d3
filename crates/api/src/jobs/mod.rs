//! Background job scheduler and job implementations.

mod expire_reservations;
mod scheduler;

pub use expire_reservations::ExpireReservationsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
