//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod identity;

pub use identity::{AdminIdentity, Identity};
