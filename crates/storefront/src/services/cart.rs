//! The persisted cart store.
//!
//! Wraps the pure [`Cart`] operations from `smartshelf-core` in a
//! load-modify-save cycle against the local storage layer. This service is
//! the only code that touches the persisted cart record; UI handlers never
//! hold a live cart reference, they ask for a fresh snapshot.
//!
//! Mutations are serialized through an internal mutex so two rapid requests
//! cannot interleave their load/save cycles and drop each other's updates.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::warn;

use smartshelf_core::{Cart, CartLine, ProductId};

use crate::storage::{Storage, StorageError, keys};

/// Errors surfaced by cart operations.
///
/// A missing or unparseable persisted record is NOT an error - it reads as an
/// empty cart. Unknown product IDs on update/remove are quiet no-ops.
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage backend could not be read or written. The UI shows a
    /// "could not update cart" message for this; the mutation did not happen.
    #[error("cart storage unavailable: {0}")]
    Storage(#[from] StorageError),

    /// The cart failed to serialize for persistence.
    #[error("cart serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Process-wide cart store backed by durable key-value storage.
pub struct CartService {
    storage: Arc<dyn Storage>,
    /// Serializes read-modify-write cycles across handlers.
    mutation_lock: Mutex<()>,
}

impl CartService {
    /// Create a cart store over the given storage backend.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Read a fresh snapshot of the cart.
    ///
    /// An absent or corrupt record is an empty cart, never an error;
    /// corruption is logged and then ignored. Callers wanting the state after
    /// a mutation must call `load` again.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend itself is unusable.
    pub fn load(&self) -> Result<Cart, CartError> {
        let _guard = self.guard();
        self.read_cart()
    }

    /// Add a line, merging by product ID, and persist.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the updated cart could not be persisted.
    pub fn add(&self, line: CartLine) -> Result<(), CartError> {
        let _guard = self.guard();
        let mut cart = self.read_cart()?;
        cart.add(line);
        self.write_cart(&cart)
    }

    /// Set the quantity of an existing line and persist.
    ///
    /// Values <= 0 are coerced to 1. Unknown product IDs are a no-op and
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the updated cart could not be persisted.
    pub fn update_quantity(&self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        let _guard = self.guard();
        let mut cart = self.read_cart()?;
        if cart.set_quantity(product_id, quantity) {
            self.write_cart(&cart)?;
        }
        Ok(())
    }

    /// Remove a line and persist the filtered cart.
    ///
    /// Unknown product IDs are a no-op; the filtered (identical) cart is
    /// still persisted, keeping removal idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the updated cart could not be persisted.
    pub fn remove(&self, product_id: ProductId) -> Result<(), CartError> {
        let _guard = self.guard();
        let mut cart = self.read_cart()?;
        cart.remove(product_id);
        self.write_cart(&cart)
    }

    /// Delete the persisted cart record entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend refused the delete.
    pub fn clear(&self) -> Result<(), CartError> {
        let _guard = self.guard();
        self.storage.delete(keys::CART)?;
        Ok(())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // Lock poisoning cannot corrupt the cart: state lives in storage and
        // every cycle re-reads it.
        self.mutation_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read_cart(&self) -> Result<Cart, CartError> {
        let Some(raw) = self.storage.read(keys::CART)? else {
            return Ok(Cart::new());
        };
        match serde_json::from_str(&raw) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                warn!(error = %e, "persisted cart is malformed, treating as empty");
                Ok(Cart::new())
            }
        }
    }

    fn write_cart(&self, cart: &Cart) -> Result<(), CartError> {
        let raw = serde_json::to_string(cart)?;
        self.storage.write(keys::CART, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use rust_decimal::Decimal;

    use crate::storage::MemoryStorage;

    use super::*;

    /// Storage whose writes (and optionally reads) can be made to fail,
    /// simulating a full or offline backing store.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl FlakyStorage {
        fn unavailable() -> StorageError {
            StorageError::Unavailable(std::io::Error::other("disk full"))
        }
    }

    impl Storage for FlakyStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.inner.write(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.inner.delete(key)
        }
    }

    fn service() -> CartService {
        CartService::new(Arc::new(MemoryStorage::new()))
    }

    fn line(id: i64, name: &str, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::from(price),
            quantity,
            sku: None,
            image_data: None,
            image_type: None,
            image_url: None,
        }
    }

    #[test]
    fn test_load_starts_empty() {
        let cart = service().load().expect("load");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_scenario_add_then_load() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");

        let cart = svc.load().expect("load");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new(1));
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_scenario_merge_keeps_first_price() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");
        svc.add(line(1, "Widget", 999, 3)).expect("add again");

        let cart = svc.load().expect("load");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.lines()[0].price, Decimal::from(10));
    }

    #[test]
    fn test_scenario_negative_quantity_coerces_to_one() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");
        svc.add(line(1, "Widget", 999, 3)).expect("add again");
        svc.update_quantity(ProductId::new(1), -1).expect("update");

        let cart = svc.load().expect("load");
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_scenario_remove_leaves_empty_cart() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");
        svc.remove(ProductId::new(1)).expect("remove");

        let cart = svc.load().expect("load");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_unknown_product_changes_nothing() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");
        svc.update_quantity(ProductId::new(77), 5).expect("update");

        let cart = svc.load().expect("load");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_remove_unknown_product_is_idempotent() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");
        svc.remove(ProductId::new(77)).expect("remove unknown");

        let cart = svc.load().expect("load");
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear_resets_any_prior_state() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");
        svc.add(line(2, "Gadget", 7, 1)).expect("add");
        svc.clear().expect("clear");

        assert!(svc.load().expect("load").is_empty());

        // Clearing an already-empty cart is fine too
        svc.clear().expect("clear again");
        assert!(svc.load().expect("load").is_empty());
    }

    #[test]
    fn test_malformed_record_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(keys::CART, "{not json at all")
            .expect("seed corrupt record");

        let svc = CartService::new(storage);
        assert!(svc.load().expect("load").is_empty());

        // Mutating after corruption starts from the empty cart
        svc.add(line(1, "Widget", 10, 1)).expect("add");
        assert_eq!(svc.load().expect("load").len(), 1);
    }

    #[test]
    fn test_unreadable_storage_surfaces_as_storage_error() {
        let storage = Arc::new(FlakyStorage::default());
        storage.fail_reads.store(true, Ordering::SeqCst);

        let svc = CartService::new(Arc::clone(&storage) as Arc<dyn Storage>);
        assert!(matches!(svc.load(), Err(CartError::Storage(_))));
        assert!(matches!(
            svc.add(line(1, "Widget", 10, 1)),
            Err(CartError::Storage(_))
        ));
    }

    #[test]
    fn test_failed_write_surfaces_and_does_not_persist() {
        let storage = Arc::new(FlakyStorage::default());
        let svc = CartService::new(Arc::clone(&storage) as Arc<dyn Storage>);

        storage.fail_writes.store(true, Ordering::SeqCst);
        assert!(matches!(
            svc.add(line(1, "Widget", 10, 2)),
            Err(CartError::Storage(_))
        ));

        // With the store healthy again, the failed add left no trace
        storage.fail_writes.store(false, Ordering::SeqCst);
        assert!(svc.load().expect("load").is_empty());

        svc.add(line(1, "Widget", 10, 2)).expect("add");
        storage.fail_writes.store(true, Ordering::SeqCst);
        assert!(matches!(svc.clear(), Err(CartError::Storage(_))));

        // A failed clear keeps the previous record intact
        storage.fail_writes.store(false, Ordering::SeqCst);
        assert_eq!(svc.load().expect("load").len(), 1);
    }

    #[test]
    fn test_mutations_share_one_storage_record() {
        let storage = Arc::new(MemoryStorage::new());
        let svc = CartService::new(Arc::clone(&storage) as Arc<dyn Storage>);
        svc.add(line(1, "Widget", 10, 2)).expect("add");

        // A second service over the same backend sees the same cart
        let other = CartService::new(storage);
        assert_eq!(other.load().expect("load").len(), 1);
    }

    #[test]
    fn test_loaded_snapshot_is_not_live() {
        let svc = service();
        svc.add(line(1, "Widget", 10, 2)).expect("add");

        let before = svc.load().expect("load");
        svc.update_quantity(ProductId::new(1), 9).expect("update");

        // The earlier snapshot is untouched; a re-load sees the new state
        assert_eq!(before.lines()[0].quantity, 2);
        assert_eq!(svc.load().expect("load").lines()[0].quantity, 9);
    }
}
