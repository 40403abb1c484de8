//! Durable local key-value storage.
//!
//! The storefront keeps exactly two records outside the inventory API: the
//! shopping cart and the opaque auth token. Both live in a small local
//! key-value store that survives restarts, the way the original product kept
//! them in the browser profile.
//!
//! Reads and writes are synchronous; callers perform a full
//! load-modify-save cycle per operation rather than holding live references.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Well-known storage keys.
///
/// The cart and the auth token are deliberately distinct records.
pub mod keys {
    /// Key for the serialized cart record.
    pub const CART: &str = "cart_items";

    /// Key for the opaque auth token.
    pub const AUTH_TOKEN: &str = "auth_token";
}

/// Errors from the storage backend.
///
/// Absence of a record is not an error (`read` returns `Ok(None)`); only the
/// backend itself being unusable surfaces here.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// A key contained characters the backend cannot represent.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A synchronous string key-value store.
///
/// Implementations must make `write` visible to the next `read` immediately;
/// the cart service relies on read-modify-write cycles seeing their own
/// effects.
pub trait Storage: Send + Sync {
    /// Read the record for `key`, or `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (create or replace) the record for `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record for `key`. Deleting an absent record is a no-op.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}
