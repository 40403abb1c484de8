//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the local cart store; the only network traffic
//! here is fetching the product being added so its name and price can be
//! captured at add-time.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use smartshelf_core::{Cart, CartLine, ProductId};

use crate::error::Result;
use crate::filters::{self, format_money};
use crate::services::CartError;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    pub image_url: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: format_money(&cart.total()),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_i64(),
            name: line.name.clone(),
            sku: line.sku.clone(),
            quantity: line.quantity,
            price: format_money(&line.price),
            line_total: format_money(&line.line_total()),
            image_url: line.display_image_url(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Error fragment for failed HTMX cart operations. An unusable cart store is
/// a real failure, never rendered as an empty cart.
fn cart_error_response(e: &CartError) -> Response {
    tracing::error!("Cart operation failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<span class=\"error\">Could not update cart</span>"),
    )
        .into_response()
}

/// Display cart page.
///
/// Storage failure surfaces as a 500, same as the checkout page; only a
/// missing or malformed record reads as an empty cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartShowTemplate> {
    let cart = state.cart().load()?;
    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
    })
}

/// Add item to cart (HTMX).
///
/// Fetches the product so name, price, sku, and image are captured at
/// add-time, then merges into the cart. Returns an HTMX trigger to update
/// the cart count badge.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let quantity = form.quantity.unwrap_or(1);

    let product = match state
        .inventory()
        .get_product(ProductId::new(form.product_id))
        .await
    {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product {}: {e}", form.product_id);
            return (
                StatusCode::BAD_GATEWAY,
                Html("<span class=\"error\">Product is unavailable</span>"),
            )
                .into_response();
        }
    };

    let count = match state
        .cart()
        .add(product.to_cart_line(quantity))
        .and_then(|()| state.cart().load())
    {
        Ok(cart) => cart.item_count(),
        Err(e) => return cart_error_response(&e),
    };

    // Return cart count with HTMX trigger to update other elements
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Update cart item quantity (HTMX).
///
/// Quantities at or below zero come back as one; removal is its own action.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    match state
        .cart()
        .update_quantity(ProductId::new(form.product_id), form.quantity)
        .and_then(|()| state.cart().load())
    {
        Ok(cart) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response(),
        Err(e) => cart_error_response(&e),
    }
}

/// Remove item from cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    match state
        .cart()
        .remove(ProductId::new(form.product_id))
        .and_then(|()| state.cart().load())
    {
        Ok(cart) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response(),
        Err(e) => cart_error_response(&e),
    }
}

/// Get cart count badge (HTMX).
///
/// HTMX leaves the badge untouched on a non-2xx response, so a broken store
/// does not masquerade as a zero-item cart.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<CartCountTemplate> {
    let cart = state.cart().load()?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}
