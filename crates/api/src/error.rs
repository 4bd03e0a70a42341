//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers and services
//! return `Result<T, ApiError>`. Responses carry a structured JSON body with
//! a machine-readable kind and a human-readable message; internal details
//! never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the order backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Referenced entity absent, or present but not owned by the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// No authenticated identity on the request.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated but lacking a required role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Missing or invalid request fields.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Storage operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    /// Machine-readable error kind for the response body.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::Validation(_) => "validation",
            Self::Repository(RepositoryError::Conflict(_)) => "conflict",
            Self::Repository(_) => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    kind: &'a str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Repository(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::NotFound(_) | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(RepositoryError::NotFound) => "not found".to_owned(),
            Self::Repository(RepositoryError::Conflict(_)) => "conflict".to_owned(),
            Self::Repository(_) => "internal server error".to_owned(),
            _ => self.to_string(),
        };

        let kind = match &self {
            Self::Repository(RepositoryError::NotFound) => "not_found",
            _ => self.kind(),
        };

        let body = ErrorBody {
            error: ErrorDetail { kind, message },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "not found: order 123");

        let err = ApiError::Validation("quantity must be positive".to_string());
        assert_eq!(err.to_string(), "validation failed: quantity must be positive");
    }

    #[test]
    fn test_api_error_status_codes() {
        fn get_status(err: ApiError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(ApiError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(ApiError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(ApiError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Repository(RepositoryError::Conflict(
                "dup".to_string()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ApiError::Repository(RepositoryError::DataCorruption(
                "bad".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ApiError::Unauthenticated.kind(), "unauthenticated");
        assert_eq!(ApiError::NotFound(String::new()).kind(), "not_found");
        assert_eq!(ApiError::Validation(String::new()).kind(), "validation");
    }
}
