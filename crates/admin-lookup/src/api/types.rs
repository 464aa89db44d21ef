//! Callable protocol request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Callable request envelope: `{"data": ...}`.
///
/// `data` stays untyped so payload validation can report a missing or
/// mistyped phone number as an invalid argument.
#[derive(Debug, Deserialize)]
pub struct CallableRequest {
    #[serde(default)]
    pub data: Value,
}

/// Callable success envelope: `{"result": ...}`.
#[derive(Debug, Serialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub function: String,
    pub store: String,
}
