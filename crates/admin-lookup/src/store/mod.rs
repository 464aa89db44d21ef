//! Read-only access to admin records.

mod firestore;
mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::config::{Config, StoreBackend};
use async_trait::async_trait;
use firestore_client::{Credentials, FirestoreClient};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Collection holding one document per admin, keyed by phone number.
pub const ADMINS_COLLECTION: &str = "Admins";

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Firestore error: {0}")]
    Firestore(#[from] firestore_client::FirestoreError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of admin records by document key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Whether a record exists under exactly this key.
    async fn admin_exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;
}

/// Build the configured store. The Firestore client is created here, once.
pub fn from_config(config: &Config) -> anyhow::Result<Arc<dyn AdminStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            let store = MemoryStore::from_seed(&config.store.seed_admins);
            info!(admins = store.count(), "Using in-memory admin store");
            Ok(Arc::new(store))
        }
        StoreBackend::Firestore => {
            let firestore = &config.firestore;
            let credentials = if firestore.emulator_host.is_some() {
                Credentials::Emulator
            } else if let Some(token) = &firestore.access_token {
                Credentials::Static(token.clone())
            } else {
                Credentials::Metadata {
                    url: firestore.metadata_url.clone(),
                }
            };

            let base_url = config.firestore_base_url();
            info!(
                base_url = %base_url,
                project_id = %firestore.project_id,
                collection = %firestore.collection,
                "Using Firestore admin store"
            );

            let client = FirestoreClient::new(
                base_url,
                firestore.project_id.clone(),
                firestore.database.clone(),
                credentials,
                firestore.timeout,
            )?;

            Ok(Arc::new(FirestoreStore::with_collection(
                client,
                firestore.collection.clone(),
            )))
        }
    }
}
