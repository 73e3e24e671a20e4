//! Unified error handling for the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use basketwatch_core::UserId;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[source] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Constraint violation (duplicate key or missing referenced row).
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_string()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let status = match &self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Set the Sentry user context from the authenticated user id.
pub fn set_sentry_user(user_id: UserId) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}
