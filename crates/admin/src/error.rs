//! Unified error handling for admin.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::carts::BatchDeleteError;
use crate::commercetools::CommercetoolsError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The cart listing could not be fetched.
    #[error("Failed to fetch carts: {0}")]
    Fetch(Arc<CommercetoolsError>),

    /// At least one cart of a batch delete was rejected.
    #[error(transparent)]
    BatchDelete(#[from] BatchDeleteError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Fetch(_) | Self::BatchDelete(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Fetch(_) | Self::BatchDelete(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Fetch(_) => "External service error".to_string(),
            Self::BatchDelete(e) => format!(
                "{} of {} cart deletions failed",
                e.failed, e.attempted
            ),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}
