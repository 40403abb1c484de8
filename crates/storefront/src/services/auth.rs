//! Opaque auth token storage.
//!
//! The inventory API may require a bearer token. The storefront only stores,
//! reads, and clears it as an opaque string - issuing and refreshing tokens
//! is the API's business.

use std::sync::Arc;

use crate::storage::{Storage, StorageError, keys};

/// Stores the bearer token under its own well-known key, separate from the
/// cart record.
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    /// Create a token store over the given storage backend.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend is unusable.
    pub fn get(&self) -> Result<Option<String>, StorageError> {
        self.storage.read(keys::AUTH_TOKEN)
    }

    /// Store (or replace) the token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend refused the write.
    pub fn set(&self, token: &str) -> Result<(), StorageError> {
        self.storage.write(keys::AUTH_TOKEN, token)
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend refused the delete.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.delete(keys::AUTH_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::MemoryStorage;

    use super::*;

    #[test]
    fn test_token_lifecycle() {
        let store = TokenStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.get().expect("get").is_none());

        store.set("opaque-token").expect("set");
        assert_eq!(store.get().expect("get").as_deref(), Some("opaque-token"));

        store.clear().expect("clear");
        assert!(store.get().expect("get").is_none());
    }

    #[test]
    fn test_token_and_cart_use_distinct_keys() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(keys::CART, "[]").expect("seed cart");

        let store = TokenStore::new(storage.clone());
        store.set("opaque-token").expect("set");

        assert_eq!(storage.read(keys::CART).expect("read").as_deref(), Some("[]"));
        store.clear().expect("clear");
        assert_eq!(storage.read(keys::CART).expect("read").as_deref(), Some("[]"));
    }
}
