//! Catalog route handlers.
//!
//! The catalog is a straight fetch-and-render over the inventory API with
//! search, category, and vendor filters. Add-to-cart buttons post to the
//! cart routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters::{self, format_money};
use crate::inventory::{Product, ProductQuery};
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub price: String,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
    pub vendor_name: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let image_url = match (&product.image_data, &product.image_type) {
            (Some(data), Some(mime)) => Some(format!("data:{mime};base64,{data}")),
            _ => None,
        };
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            price: format_money(&product.price),
            stock: product.current_stock,
            image_url,
            vendor_name: product.vendor_name.clone(),
        }
    }
}

/// Vendor option for the filter bar.
#[derive(Clone)]
pub struct VendorOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

/// Catalog filter/pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub vendor: Option<i64>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<String>,
    pub vendors: Vec<VendorOption>,
    pub search: String,
    pub selected_category: String,
    /// Vendor filter as query-string text; empty when no vendor is selected.
    pub selected_vendor: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more_pages: bool,
}

/// Display the catalog page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogIndexTemplate> {
    let page = query.page.unwrap_or(0);
    let search = query.search.unwrap_or_default();
    let selected_category = query.category.unwrap_or_default();

    let product_query = ProductQuery {
        page,
        search: (!search.is_empty()).then(|| search.clone()),
        category: (!selected_category.is_empty()).then(|| selected_category.clone()),
        vendor: query.vendor.map(Into::into),
        ..ProductQuery::default()
    };

    let listing = state.inventory().list_products(&product_query).await?;

    // Filter data is decoration; a failing lookup must not take the
    // catalog down with it.
    let categories = state.inventory().list_categories().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load categories: {e}");
        Vec::new()
    });
    let vendors = match state.inventory().list_vendors().await {
        Ok(vendors) => vendors
            .iter()
            .map(|v| VendorOption {
                id: v.id.as_i64(),
                name: v.display_name(),
                selected: query.vendor == Some(v.id.as_i64()),
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to load vendors: {e}");
            Vec::new()
        }
    };

    let total_pages = listing.total_pages.max(1);
    Ok(CatalogIndexTemplate {
        products: listing.content.iter().map(ProductCardView::from).collect(),
        categories,
        vendors,
        search,
        selected_category,
        selected_vendor: query.vendor.map(|v| v.to_string()).unwrap_or_default(),
        current_page: page,
        total_pages,
        has_more_pages: page + 1 < total_pages,
    })
}
