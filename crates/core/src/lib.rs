//! SmartShelf Core - Shared types and cart logic.
//!
//! This crate provides the domain types used across SmartShelf components:
//! - `storefront` - Public-facing catalog, cart, and checkout site
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe entity IDs
//! - [`cart`] - The shopping cart and its line-merging rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartLine};
pub use types::*;
