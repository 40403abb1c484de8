//! Remote inventory REST API client.
//!
//! # Architecture
//!
//! - The inventory API is the source of truth for products, vendors, and
//!   purchase orders - NO local sync, direct API calls
//! - In-memory caching via `moka` for product and category reads (5 minute
//!   TTL); purchase-order creation is never cached
//! - Responses arrive in the API's `ApiResponse`/`PagedResponse` envelopes
//!
//! # Example
//!
//! ```rust,ignore
//! use smartshelf_storefront::inventory::{InventoryClient, ProductQuery};
//!
//! let client = InventoryClient::new(&config.inventory, tokens);
//!
//! // Page through the catalog
//! let page = client.list_products(&ProductQuery::default()).await?;
//!
//! // Create a purchase order for one cart line
//! let order = client.create_purchase_order(&request, UserId::new(1)).await?;
//! ```

mod client;
pub mod types;

pub use client::{InventoryClient, ProductQuery};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the inventory API.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error envelope or non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message from the response body, truncated.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}
