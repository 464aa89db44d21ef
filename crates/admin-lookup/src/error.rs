//! Error types for the admin lookup endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Message returned for any payload without a usable phone number.
pub const INVALID_PHONE_MESSAGE: &str = "Valid phone number is required";

/// Message returned for any store failure. Store details never reach the caller.
pub const LOOKUP_FAILED_MESSAGE: &str = "Admin lookup failed. Please try again.";

/// Failure of a `checkAdminExists` invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("{}", INVALID_PHONE_MESSAGE)]
    InvalidArgument,

    #[error("{}", LOOKUP_FAILED_MESSAGE)]
    LookupFailed,

    #[error("Bad request: {0}")]
    MalformedRequest(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl CheckError {
    /// Canonical status name used in the callable error envelope.
    pub fn status(&self) -> &'static str {
        match self {
            CheckError::InvalidArgument | CheckError::MalformedRequest(_) => "INVALID_ARGUMENT",
            CheckError::LookupFailed => "INTERNAL",
            CheckError::RateLimitExceeded => "RESOURCE_EXHAUSTED",
            CheckError::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            CheckError::InvalidArgument | CheckError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            CheckError::LookupFailed => StatusCode::INTERNAL_SERVER_ERROR,
            CheckError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            CheckError::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

/// Error response body: `{"error": {"status": ..., "message": ...}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub status: String,
    pub message: String,
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                status: self.status().to_string(),
                message: self.to_string(),
            },
        };

        (self.http_status(), Json(body)).into_response()
    }
}
