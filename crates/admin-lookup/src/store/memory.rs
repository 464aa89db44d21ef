//! In-memory admin store.

use super::{AdminStore, StoreError};
use async_trait::async_trait;
use std::collections::HashSet;

/// Admin keys held in memory. Keys are matched verbatim.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keys: HashSet<String>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Create a store holding the given keys.
    pub fn with_admins<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a store from a comma-separated key list, skipping blanks.
    pub fn from_seed(seed: &str) -> Self {
        Self::with_admins(
            seed.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty()),
        )
    }

    /// Get the number of stored keys.
    pub fn count(&self) -> usize {
        self.keys.len()
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn admin_exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.keys.contains(key))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exact_key_match() {
        let store = MemoryStore::with_admins(["+233244123456"]);

        assert!(store.admin_exists("+233244123456").await.unwrap());
        assert!(!store.admin_exists("233244123456").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(store.count(), 0);
        assert!(!store.admin_exists("233200000000").await.unwrap());
    }

    #[test]
    fn test_from_seed_skips_blanks() {
        let store = MemoryStore::from_seed(" +233244123456, ,233501234567,");
        assert_eq!(store.count(), 2);
        assert!(tokio_test::block_on(store.admin_exists("+233244123456")).unwrap());
    }

    #[test]
    fn test_from_empty_seed() {
        assert_eq!(MemoryStore::from_seed("").count(), 0);
    }
}
