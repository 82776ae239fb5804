//! API error types and handling for the relief REST API.
//!
//! Every error renders as a JSON body `{code, message, details?}` with a
//! status code chosen from the error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ReliefError;

/// API error type that converts to HTTP responses.
///
/// Pipeline failures keep their [`ReliefError`] kind; only request-shape
/// checks done in the API layer itself produce [`ApiError::ValidationError`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Well-formed request that fails validation (422)
    #[error("Validation failed: {message}")]
    ValidationError {
        /// What is wrong
        message: String,
        /// Offending field
        field: Option<String>,
    },

    /// Error from the relief pipeline
    #[error("{0}")]
    Domain(#[from] ReliefError),
}

impl ApiError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>, field: Option<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Domain(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Domain(ReliefError::ModelUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::Domain(e) => match e {
                ReliefError::UnknownLocation(_) => "UNKNOWN_LOCATION",
                ReliefError::UnknownDisasterCategory(_) => "UNKNOWN_DISASTER_CATEGORY",
                ReliefError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
                ReliefError::InvalidInput { .. } => "INVALID_INPUT",
                ReliefError::Inference(_) => "INFERENCE_ERROR",
                ReliefError::ReferenceData(_)
                | ReliefError::Config(_)
                | ReliefError::Io(_) => "INTERNAL_ERROR",
            },
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            Self::ValidationError { field, .. } => field.clone(),
            Self::Domain(ReliefError::InvalidInput { field, .. }) => Some(field.clone()),
            _ => None,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Additional error details.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Field that caused the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();
        let message = self.to_string();
        let details = self.field().map(|field| ErrorDetails { field: Some(field) });

        if status.is_server_error() {
            tracing::error!(error = %self, code = %code, "API error");
        } else {
            tracing::warn!(error = %self, "API error");
        }

        let body = ErrorResponse {
            code,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
