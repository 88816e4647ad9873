//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error body has the same shape:
//!
//! ```json
//! {"status": "error", "message": "...", "error_code": "..."}
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use toggle_checkout_core::RejectionReason;

use crate::services::{CartError, CheckoutError};

/// Application-level error type for the checkout API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The checkout was refused by the validator.
    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    /// The cart could not be fetched.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Rejected(reason) => Self::Rejected(reason),
            CheckoutError::Cart(err) => Self::Cart(err),
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    error_code: &'static str,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Rejected(RejectionReason::FeatureDisabled) => StatusCode::FORBIDDEN,
            Self::Rejected(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Cart(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Rejected(reason) => reason.code(),
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Cart(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Cart(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Rejected(reason) => reason.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Cart(_) => "Internal server error".to_string(),
        };

        let body = ErrorBody {
            status: "error",
            message,
            error_code: self.code(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
