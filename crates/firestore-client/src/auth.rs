//! Bearer credentials for Firestore requests.

use crate::error::FirestoreError;
use crate::types::TokenResponse;
use reqwest::Client;
use secrecy::SecretString;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Token endpoint of the GCE / Cloud Run metadata server.
pub const DEFAULT_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before the server-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Where the bearer token for each request comes from.
#[derive(Clone, Debug)]
pub enum Credentials {
    /// A fixed access token.
    Static(SecretString),
    /// The Firestore emulator, which accepts the `owner` token.
    Emulator,
    /// Service account token from the metadata server.
    Metadata { url: String },
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Resolves [`Credentials`] into a bearer token, caching metadata tokens.
pub(crate) struct TokenProvider {
    credentials: Credentials,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    pub(crate) fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cached: RwLock::new(None),
        }
    }

    pub(crate) async fn token(&self, http: &Client) -> Result<SecretString, FirestoreError> {
        match &self.credentials {
            Credentials::Static(token) => Ok(token.clone()),
            Credentials::Emulator => Ok(SecretString::new("owner".to_string())),
            Credentials::Metadata { url } => self.metadata_token(http, url).await,
        }
    }

    async fn metadata_token(&self, http: &Client, url: &str) -> Result<SecretString, FirestoreError> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if Instant::now() < entry.refresh_at {
                    return Ok(entry.token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Another request may have refreshed while we waited for the lock
        if let Some(entry) = cached.as_ref() {
            if Instant::now() < entry.refresh_at {
                return Ok(entry.token.clone());
            }
        }

        debug!("Fetching access token from metadata server");

        let response = http
            .get(url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Metadata server refused token request");
            return Err(FirestoreError::Token(format!(
                "metadata server returned {}",
                status
            )));
        }

        let body: TokenResponse = response.json().await?;
        if body.access_token.is_empty() {
            return Err(FirestoreError::Token("empty access token".into()));
        }

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(EXPIRY_MARGIN);
        let token = SecretString::new(body.access_token);

        *cached = Some(CachedToken {
            token: token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        debug!(token_type = %body.token_type, expires_in = body.expires_in, "Access token refreshed");
        Ok(token)
    }
}
