//! Wire types for the inventory REST API.
//!
//! Field names mirror the API's camelCase JSON. Everything the storefront
//! does not consume is left off; serde ignores unknown fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use smartshelf_core::{CartLine, ProductId, VendorId};

/// Standard response envelope: `{status, message, data, timestamp, path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// "success" or "error".
    pub status: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// The payload; absent on some error responses.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether the envelope reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Paged collection envelope used by list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Zero-based page index.
    #[serde(default)]
    pub current_page: u32,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Page size requested.
    #[serde(default)]
    pub page_size: u32,
    /// Total items across all pages.
    #[serde(default)]
    pub total_elements: u64,
}

/// List payload that is paged on some deployments and flat on others.
///
/// The vendor endpoint historically returned either `{"content": [..]}` or a
/// bare array depending on backend version; accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(PagedResponse<T>),
    Flat(Vec<T>),
}

impl<T> Listing<T> {
    /// The items, whichever shape they arrived in.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paged(page) => page.content,
            Self::Flat(items) => items,
        }
    }
}

/// A catalog product as served by the inventory API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub current_stock: Option<i64>,
    /// Raw image bytes, base64-encoded.
    #[serde(default)]
    pub image_data: Option<String>,
    /// MIME type for `image_data`.
    #[serde(default)]
    pub image_type: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub vendor_name: Option<String>,
}

impl Product {
    /// Build the cart line for adding `quantity` units of this product.
    ///
    /// Name, price, sku, and image are captured here, at add-time; later
    /// catalog changes never touch lines already in the cart.
    #[must_use]
    pub fn to_cart_line(&self, quantity: u32) -> CartLine {
        CartLine {
            product_id: self.id,
            name: self.name.clone(),
            price: self.price,
            quantity: quantity.max(1),
            sku: self.sku.clone(),
            image_data: self.image_data.clone(),
            image_type: self.image_type.clone(),
            image_url: None,
        }
    }
}

/// A vendor, consumed only for the catalog filter bar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Vendor {
    /// Display name: "First Last", falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            self.email.clone().unwrap_or_default()
        } else {
            name.to_string()
        }
    }
}

/// Entity reference in a purchase-order body: `{"id": ..}`.
#[derive(Debug, Clone, Serialize)]
pub struct EntityRef {
    pub id: i64,
}

/// Purchase-order creation request.
///
/// The checkout surface sends one of these per distinct cart line:
/// `{product: {id}, vendor: {id}|null, quantity, unitPrice, notes}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderRequest {
    pub product: EntityRef,
    pub vendor: Option<EntityRef>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub notes: String,
}

impl PurchaseOrderRequest {
    /// Build the request for one cart line.
    #[must_use]
    pub fn from_cart_line(line: &CartLine, notes: &str) -> Self {
        Self {
            product: EntityRef {
                id: line.product_id.as_i64(),
            },
            vendor: None,
            quantity: line.quantity,
            unit_price: line.price,
            notes: if notes.is_empty() {
                "Order from storefront checkout.".to_string()
            } else {
                notes.to_string()
            },
        }
    }
}

/// The slice of a created purchase order the storefront cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: smartshelf_core::PurchaseOrderId,
    #[serde(default)]
    pub status: Option<String>,
}
