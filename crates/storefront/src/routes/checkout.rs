//! Checkout route handlers.
//!
//! Checkout turns each distinct cart line into one purchase-order creation
//! request against the inventory API. The cart is cleared after submission
//! whether or not every order call succeeded; the page message reports how
//! many lines went through.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use tracing::instrument;

use smartshelf_core::UserId;

use crate::error::Result;
use crate::filters;
use crate::inventory::PurchaseOrderRequest;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// The storefront has no login of its own; orders are attributed to the
/// shared storefront account on the inventory side.
const CHECKOUT_USER: UserId = UserId::new(1);

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub notes: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub message: Option<String>,
}

/// Display the checkout page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CheckoutTemplate> {
    let cart = state.cart().load()?;
    Ok(CheckoutTemplate {
        cart: CartView::from(&cart),
        message: None,
    })
}

/// Place the order: one purchase-order request per distinct cart line.
#[instrument(skip(state, form))]
pub async fn place_order(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Result<CheckoutTemplate> {
    let cart = state.cart().load()?;

    if cart.is_empty() {
        return Ok(CheckoutTemplate {
            cart: CartView::from(&cart),
            message: Some("Cart is empty.".to_string()),
        });
    }

    let notes = form.notes.unwrap_or_default();
    let mut placed = 0usize;
    let mut failed = 0usize;

    for line in cart.lines() {
        let request = PurchaseOrderRequest::from_cart_line(line, notes.trim());
        match state
            .inventory()
            .create_purchase_order(&request, CHECKOUT_USER)
            .await
        {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id,
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    "purchase order created"
                );
                placed += 1;
            }
            Err(e) => {
                tracing::error!(
                    product_id = %line.product_id,
                    "failed to create purchase order: {e}"
                );
                failed += 1;
            }
        }
    }

    // The cart is cleared regardless of per-line outcomes.
    state.cart().clear()?;

    let message = if failed == 0 {
        "Order placed successfully. Clearing cart.".to_string()
    } else if placed > 0 {
        format!("Order placed with {failed} of {} lines failing. Clearing cart.", placed + failed)
    } else {
        "Could not reach the inventory API; order was not placed. Clearing cart.".to_string()
    };

    let cart = state.cart().load()?;
    Ok(CheckoutTemplate {
        cart: CartView::from(&cart),
        message: Some(message),
    })
}
