//! Inventory REST API client implementation.
//!
//! Plain REST over `reqwest`, with `moka` caching for catalog reads
//! (5-minute TTL). Purchase-order creation always goes to the wire.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use smartshelf_core::{ProductId, UserId, VendorId};

use crate::config::InventoryApiConfig;
use crate::inventory::InventoryError;
use crate::inventory::types::{
    ApiResponse, Listing, PagedResponse, Product, PurchaseOrder, PurchaseOrderRequest, Vendor,
};
use crate::services::TokenStore;

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(i64),
    Products {
        page: u32,
        size: u32,
        search: Option<String>,
        category: Option<String>,
        vendor: Option<i64>,
    },
    Categories,
    Vendors,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(PagedResponse<Product>),
    Categories(Vec<String>),
    Vendors(Vec<Vendor>),
}

/// Catalog listing parameters.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    /// Zero-based page index.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Free-text search over name and SKU.
    pub search: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Vendor filter.
    pub vendor: Option<VendorId>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            search: None,
            category: None,
            vendor: None,
        }
    }
}

/// Client for the remote inventory REST API.
///
/// Cheaply cloneable; catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct InventoryClient {
    inner: Arc<InventoryClientInner>,
}

struct InventoryClientInner {
    client: reqwest::Client,
    base_url: String,
    /// Deployment-pinned token from config; wins over the stored one.
    config_token: Option<String>,
    tokens: Arc<TokenStore>,
    cache: Cache<CacheKey, CacheValue>,
}

impl InventoryClient {
    /// Create a new inventory API client.
    #[must_use]
    pub fn new(config: &InventoryApiConfig, tokens: Arc<TokenStore>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(InventoryClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                config_token: config
                    .token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                tokens,
                cache,
            }),
        }
    }

    /// List a catalog page.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if the API is unreachable or answers with
    /// an error envelope.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<PagedResponse<Product>, InventoryError> {
        let key = CacheKey::Products {
            page: query.page,
            size: query.size,
            search: query.search.clone(),
            category: query.category.clone(),
            vendor: query.vendor.map(|v| v.as_i64()),
        };
        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&key).await {
            debug!("catalog page served from cache");
            return Ok(page);
        }

        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.to_string()),
            ("size", query.size.to_string()),
            ("sortBy", "id".to_string()),
            ("sortDir", "asc".to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        if let Some(vendor) = query.vendor {
            params.push(("vendor", vendor.to_string()));
        }

        let page: PagedResponse<Product> = self.get("/api/products", &params).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Products(page.clone()))
            .await;
        Ok(page)
    }

    /// Fetch a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the API has no such product.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError> {
        let key = CacheKey::Product(id.as_i64());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            return Ok(*product);
        }

        let path = format!("/api/products/{id}");
        let product: Product = match self.get(&path, &[]).await {
            Ok(product) => product,
            Err(InventoryError::Api { status: 404, .. }) => {
                return Err(InventoryError::NotFound(format!("product {id}")));
            }
            Err(e) => return Err(e),
        };
        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// List product categories for the filter bar.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if the API is unreachable.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>, InventoryError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            return Ok(categories);
        }

        let categories: Vec<String> = self.get("/api/products/categories", &[]).await?;
        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// List vendors for the filter bar.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if the API is unreachable.
    #[instrument(skip(self))]
    pub async fn list_vendors(&self) -> Result<Vec<Vendor>, InventoryError> {
        if let Some(CacheValue::Vendors(vendors)) = self.inner.cache.get(&CacheKey::Vendors).await
        {
            return Ok(vendors);
        }

        let listing: Listing<Vendor> = self.get("/api/vendors", &[]).await?;
        let vendors = listing.into_items();
        self.inner
            .cache
            .insert(CacheKey::Vendors, CacheValue::Vendors(vendors.clone()))
            .await;
        Ok(vendors)
    }

    /// Create one purchase order. Never cached.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if the request fails or the API answers
    /// with an error envelope.
    #[instrument(skip(self, request))]
    pub async fn create_purchase_order(
        &self,
        request: &PurchaseOrderRequest,
        created_by: UserId,
    ) -> Result<PurchaseOrder, InventoryError> {
        let url = format!("{}/api/purchase-orders", self.inner.base_url);
        let response = self
            .authorized(self.inner.client.post(&url))
            .query(&[("createdBy", created_by.to_string())])
            .json(request)
            .send()
            .await?;

        self.parse_envelope(response).await
    }

    /// Cheap connectivity probe for the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Http`] when the API host is unreachable.
    pub async fn ping(&self) -> Result<(), InventoryError> {
        let url = format!("{}/api/products/categories", self.inner.base_url);
        self.authorized(self.inner.client.get(&url)).send().await?;
        Ok(())
    }

    /// GET a path and unwrap the `ApiResponse` envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, InventoryError> {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.authorized(self.inner.client.get(&url));
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().await?;
        self.parse_envelope(response).await
    }

    /// Attach the bearer token, preferring config over the stored one.
    ///
    /// The stored token is re-read per request, so a token set or cleared at
    /// runtime takes effect immediately.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = match &self.inner.config_token {
            Some(token) => Some(token.clone()),
            None => self.inner.tokens.get().ok().flatten(),
        };
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Parse an `ApiResponse<T>` body, converting error statuses and error
    /// envelopes into `InventoryError::Api`.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, InventoryError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "inventory API returned non-success status"
            );
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse inventory API response"
            );
            InventoryError::Parse(e)
        })?;

        if !envelope.is_success() {
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "(no error details provided)".to_string()),
            });
        }

        envelope.data.ok_or_else(|| InventoryError::Api {
            status: status.as_u16(),
            message: "success envelope without data".to_string(),
        })
    }
}
