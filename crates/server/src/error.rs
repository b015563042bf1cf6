//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::storage::StorageError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Auth service operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Storage service operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request body failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body: `{ "error": "...", "details": "..."? }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, error, details) = match &self {
            Self::Database(err) if err.is_unavailable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Backend not configured".to_owned(),
                Some(
                    "The database could not be reached. Verify SHOPLARK_DATABASE_URL and \
                     SHOPLARK_BACKEND_URL are set correctly."
                        .to_owned(),
                ),
            ),
            Self::Database(RepositoryError::Conflict(message)) => {
                (StatusCode::CONFLICT, message.clone(), None)
            }
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
                None,
            ),
            Self::Auth(err) => match err {
                AuthError::InvalidToken => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_owned(),
                    None,
                ),
                AuthError::UserNotFound => {
                    (StatusCode::UNAUTHORIZED, "Unknown user".to_owned(), None)
                }
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "Authentication service error".to_owned(),
                    None,
                ),
            },
            Self::Storage(err) => match err {
                StorageError::TooLarge { max_bytes } => (
                    StatusCode::BAD_REQUEST,
                    format!("File too large. Maximum size is {max_bytes} bytes"),
                    None,
                ),
                StorageError::UnsupportedType(content_type) => (
                    StatusCode::BAD_REQUEST,
                    format!("Only image files are allowed, got {content_type}"),
                    None,
                ),
                StorageError::MissingFile => (
                    StatusCode::BAD_REQUEST,
                    "No image file provided".to_owned(),
                    None,
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "Storage service error".to_owned(),
                    None,
                ),
            },
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone(), None),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone(), None),
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message.clone(), None),
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Store not found".to_owned());
        assert_eq!(err.to_string(), "Not found: Store not found");

        let err = AppError::Validation("store_name is required".to_owned());
        assert_eq!(err.to_string(), "Validation error: store_name is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("test".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Validation("test".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = AppError::Database(RepositoryError::Conflict(
            "Customer with this email already exists".to_owned(),
        ));
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unreachable_database_maps_to_503() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = AppError::Database(RepositoryError::Database(sqlx::Error::Io(io)));
        assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
    }
}
