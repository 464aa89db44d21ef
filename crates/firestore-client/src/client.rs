//! Firestore REST client.

use crate::auth::{Credentials, TokenProvider};
use crate::error::FirestoreError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Production Firestore endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";

/// Name of the database every project gets on creation.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Read-only Firestore client over the REST API.
///
/// Cheap to clone: the HTTP connection pool and token cache are shared.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    base_url: String,
    project_id: String,
    database_id: String,
    tokens: Arc<TokenProvider>,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, FirestoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            tokens: Arc::new(TokenProvider::new(credentials)),
        })
    }

    /// Full resource name of a document, as used in request bodies.
    pub fn document_name(&self, collection: &str, document_id: &str) -> Result<String, FirestoreError> {
        validate_document_id(document_id)?;

        Ok(format!(
            "projects/{}/databases/{}/documents/{}/{}",
            self.project_id, self.database_id, collection, document_id
        ))
    }

    fn batch_get_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents:batchGet",
            self.base_url, self.project_id, self.database_id
        )
    }

    /// Check whether a document exists without transferring its fields.
    ///
    /// An absent document is reported by Firestore as `missing`; any non-2xx
    /// response, including a 404 for an unknown project or database, is an error.
    #[instrument(skip(self))]
    pub async fn document_exists(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<bool, FirestoreError> {
        let name = self.document_name(collection, document_id)?;
        let request = BatchGetRequest {
            documents: vec![name.clone()],
            mask: Some(DocumentMask {
                field_paths: vec!["__name__".to_string()],
            }),
        };

        let document = self.batch_get_one(&name, &request).await?;
        Ok(document.is_some())
    }

    async fn batch_get_one(
        &self,
        name: &str,
        request: &BatchGetRequest,
    ) -> Result<Option<Document>, FirestoreError> {
        let token = self.tokens.token(&self.client).await?;
        let url = self.batch_get_url();

        debug!(url = %url, document = %name, "Fetching document");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token.expose_secret()))
            .json(request)
            .send()
            .await?;

        let results = self.handle_response::<Vec<BatchGetResponse>>(response).await?;

        for result in results {
            if let Some(document) = result.found {
                if document.name == name {
                    debug!(document_id = %document.id(), "Document found");
                    return Ok(Some(document));
                }
            }
            if result.missing.as_deref() == Some(name) {
                debug!(document = %name, "Document not found");
                return Ok(None);
            }
        }

        Err(FirestoreError::UnexpectedResponse(format!(
            "batchGet returned no result for {}",
            name
        )))
    }

    /// Handle HTTP response, converting errors appropriately.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FirestoreError> {
        if response.status().is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(FirestoreError::from)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error information from failed response.
    async fn extract_error(&self, response: reqwest::Response) -> FirestoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(status = %status, "Firestore denied access");
                FirestoreError::PermissionDenied(message)
            }
            _ => FirestoreError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Reject ids the REST API would interpret as a different resource path.
fn validate_document_id(document_id: &str) -> Result<(), FirestoreError> {
    if document_id.is_empty()
        || document_id == "."
        || document_id == ".."
        || document_id.contains('/')
    {
        return Err(FirestoreError::InvalidDocumentId(document_id.to_string()));
    }
    Ok(())
}
