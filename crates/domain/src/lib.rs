//! Domain layer for the microwave booking backend.
//!
//! This crate contains:
//! - Domain models (Device, Reservation, UserContext)
//! - The device registry, reservation ledger, and lifecycle controller
//! - The abstract storage port the controller persists through
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::BookingError;
pub use storage::{BookingStore, StorageError};
