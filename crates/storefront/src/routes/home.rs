//! Home route handler.

use axum::response::Redirect;

/// The storefront's front door is the catalog.
pub async fn home() -> Redirect {
    Redirect::to("/catalog")
}
