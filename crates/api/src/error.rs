use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::BookingError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::InvalidState(msg) => (StatusCode::CONFLICT, "invalid_state", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::InvalidTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_transition",
                msg.clone(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) => ApiError::Validation(msg),
            BookingError::NotFound(msg) => ApiError::NotFound(msg),
            BookingError::Conflict(msg) => ApiError::Conflict(msg),
            // State preconditions share the 409 status but keep their own
            // error code in the body.
            BookingError::InvalidState(msg) => ApiError::InvalidState(msg),
            BookingError::Authorization(msg) => ApiError::Forbidden(msg),
            BookingError::InvalidTransition(msg) => ApiError::InvalidTransition(msg),
            BookingError::Storage(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
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

        ApiError::Validation(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use domain::StorageError;

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (
                ApiError::Unauthorized("missing identity".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("not yours".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound("no such device".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Conflict("already reserved".into()),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::InvalidState("under maintenance".into()),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Validation("bad duration".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::InvalidTransition("completed is terminal".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Internal("pool exhausted".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_booking_error_mapping() {
        let cases = [
            (
                BookingError::Validation("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (BookingError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (BookingError::Conflict("x".into()), StatusCode::CONFLICT),
            (BookingError::InvalidState("x".into()), StatusCode::CONFLICT),
            (
                BookingError::Authorization("x".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                BookingError::InvalidTransition("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                BookingError::Storage(StorageError("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let api_error: ApiError = error.into();
            assert_eq!(api_error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::NotFound("test".to_string())),
            "Not found: test"
        );
        assert_eq!(
            format!("{}", ApiError::Validation("test".to_string())),
            "Validation error: test"
        );
    }
}
