//! Firestore client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirestoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Invalid document id: {0:?}")]
    InvalidDocumentId(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
