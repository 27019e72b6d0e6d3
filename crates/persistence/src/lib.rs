//! Persistence layer for the microwave booking backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Storage port implementations (PostgreSQL and in-memory)

pub mod db;
pub mod entities;
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;
