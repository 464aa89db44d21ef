//! Resource types for the Firestore REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A Firestore document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, e.g.
    /// `projects/p/databases/(default)/documents/Admins/+233244123456`
    pub name: String,

    /// Typed field values, kept in their wire form (`{"stringValue": ...}`)
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,

    pub create_time: Option<DateTime<Utc>>,

    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// Last path segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Body of `documents:batchGet`.
#[derive(Debug, Serialize)]
pub struct BatchGetRequest {
    pub documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<DocumentMask>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMask {
    pub field_paths: Vec<String>,
}

/// One element of the `documents:batchGet` response array.
///
/// Exactly one of `found` and `missing` is set for document results.
#[derive(Debug, Deserialize)]
pub struct BatchGetResponse {
    pub found: Option<Document>,
    /// Resource name of a document that does not exist
    pub missing: Option<String>,
}

/// Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// OAuth2 access token issued by the metadata server.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}
