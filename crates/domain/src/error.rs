//! Domain error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Failure taxonomy for booking operations.
///
/// Every controller, registry, and ledger operation returns one of these;
/// callers can rely on the kind to decide how to respond. None of them is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Input failed shape or range validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown device or reservation id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Exclusivity or state-precondition violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation not allowed in the current device or reservation state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Actor lacks permission for the requested operation.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Illegal reservation status transition requested on the ledger.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// The storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl BookingError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::Validation(_) => "validation_error",
            BookingError::NotFound(_) => "not_found",
            BookingError::Conflict(_) => "conflict",
            BookingError::InvalidState(_) => "invalid_state",
            BookingError::Authorization(_) => "not_authorized",
            BookingError::InvalidTransition(_) => "invalid_transition",
            BookingError::Storage(_) => "storage_error",
        }
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();

        BookingError::Validation(messages.join("; "))
    }
}
