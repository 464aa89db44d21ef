//! Firestore-backed admin store.

use super::{AdminStore, StoreError, ADMINS_COLLECTION};
use async_trait::async_trait;
use firestore_client::FirestoreClient;
use tracing::debug;

/// Admin records held as documents in a Firestore collection.
#[derive(Clone)]
pub struct FirestoreStore {
    client: FirestoreClient,
    collection: String,
}

impl FirestoreStore {
    /// Create a store reading from the `Admins` collection.
    pub fn new(client: FirestoreClient) -> Self {
        Self::with_collection(client, ADMINS_COLLECTION)
    }

    /// Create a store reading from a custom collection.
    pub fn with_collection(client: FirestoreClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl AdminStore for FirestoreStore {
    async fn admin_exists(&self, key: &str) -> Result<bool, StoreError> {
        let exists = self.client.document_exists(&self.collection, key).await?;
        debug!(collection = %self.collection, key = %key, exists, "Admin document lookup");
        Ok(exists)
    }

    fn backend(&self) -> &'static str {
        "firestore"
    }
}
