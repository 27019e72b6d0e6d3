//! Shared utilities for the microwave booking backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Validation logic for device and reservation payloads

pub mod validation;
