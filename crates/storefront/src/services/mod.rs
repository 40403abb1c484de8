//! Storefront services.

pub mod auth;
pub mod cart;

pub use auth::TokenStore;
pub use cart::{CartError, CartService};
