//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::inventory::InventoryClient;
use crate::services::{CartService, TokenStore};
use crate::storage::{FileStorage, Storage, StorageError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the cart store and the inventory API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartService,
    tokens: Arc<TokenStore>,
    inventory: InventoryClient,
}

impl AppState {
    /// Create application state with file-backed storage under the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorageError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.data_dir)?);
        Ok(Self::with_storage(config, storage))
    }

    /// Create application state over an explicit storage backend.
    ///
    /// Tests use this with in-memory storage.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn Storage>) -> Self {
        let cart = CartService::new(Arc::clone(&storage));
        let tokens = Arc::new(TokenStore::new(storage));
        let inventory = InventoryClient::new(&config.inventory, Arc::clone(&tokens));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                tokens,
                inventory,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    /// Get a reference to the auth token store.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Get a reference to the inventory API client.
    #[must_use]
    pub fn inventory(&self) -> &InventoryClient {
        &self.inner.inventory
    }
}
