//! Product detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use smartshelf_core::ProductId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::inventory::InventoryError;
use crate::routes::catalog::ProductCardView;
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductCardView,
}

/// Display product detail page with an explicit quantity field.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ProductShowTemplate> {
    let product = state
        .inventory()
        .get_product(ProductId::new(id))
        .await
        .map_err(|e| match e {
            InventoryError::NotFound(what) => AppError::NotFound(what),
            other => AppError::Inventory(other),
        })?;

    Ok(ProductShowTemplate {
        product: ProductCardView::from(&product),
    })
}
