//! Admin existence check with fallback to the legacy key format.

use crate::error::CheckError;
use crate::phone::{normalize_payload, CanonicalPhone};
use crate::store::{AdminStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Result of a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLookup {
    pub exists: bool,
}

/// Key format under which an admin record was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// `+233...`
    Prefixed,
    /// `233...`, written by older clients
    Unprefixed,
}

/// Resolves canonical phone keys against an [`AdminStore`].
#[derive(Clone)]
pub struct AdminResolver {
    store: Arc<dyn AdminStore>,
}

impl AdminResolver {
    pub fn new(store: Arc<dyn AdminStore>) -> Self {
        Self { store }
    }

    /// Backend name of the underlying store.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Validate a callable payload, normalize its phone number, and resolve it.
    pub async fn check(&self, data: &Value) -> Result<AdminLookup, CheckError> {
        let phone = normalize_payload(data)?;
        self.resolve(&phone).await
    }

    /// Resolve a canonical key.
    ///
    /// Store failures are logged by message and reported as
    /// [`CheckError::LookupFailed`] without detail.
    pub async fn resolve(&self, phone: &CanonicalPhone) -> Result<AdminLookup, CheckError> {
        match self.find(phone).await {
            Ok(Some(format)) => {
                info!(phone = %phone, ?format, "Admin found");
                Ok(AdminLookup { exists: true })
            }
            Ok(None) => {
                info!(phone = %phone, "No admin for phone number");
                Ok(AdminLookup { exists: false })
            }
            Err(e) => {
                error!(phone = %phone, error = %e, "Error in checkAdminExists");
                Err(CheckError::LookupFailed)
            }
        }
    }

    /// Look up the prefixed key, then the unprefixed key on a miss.
    ///
    /// The second query is only issued after the first completes without a hit.
    pub async fn find(&self, phone: &CanonicalPhone) -> Result<Option<KeyFormat>, StoreError> {
        if self.store.admin_exists(phone.as_str()).await? {
            return Ok(Some(KeyFormat::Prefixed));
        }

        debug!(phone = %phone, "Primary key missed, trying unprefixed key");

        if self.store.admin_exists(phone.unprefixed()).await? {
            return Ok(Some(KeyFormat::Unprefixed));
        }

        Ok(None)
    }
}
