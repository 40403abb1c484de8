//! In-memory storage, used by tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Storage, StorageError};

/// A `HashMap` behind a mutex. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock means another test thread panicked mid-write;
        // the map itself is still a plain string map, so keep going.
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.read("cart_items").expect("read").is_none());

        storage.write("cart_items", "[]").expect("write");
        assert_eq!(storage.read("cart_items").expect("read").as_deref(), Some("[]"));

        storage.delete("cart_items").expect("delete");
        assert!(storage.read("cart_items").expect("read").is_none());
    }
}
