//! The shopping cart and its line-merging rules.
//!
//! A [`Cart`] is an ordered sequence of [`CartLine`]s keyed by product ID.
//! Two lines never share a product ID: adding a product that is already in
//! the cart merges quantities instead of appending a duplicate line.
//!
//! This module is pure - persistence lives in the storefront's cart service,
//! which wraps these operations in a load/mutate/save cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One entry in the cart, uniquely identified by product ID.
///
/// `name`, `price`, `sku`, and the image fields are captured at add-time from
/// the catalog and are not refreshed from the server afterwards.
///
/// The serialized form is the persisted cart record: a camelCase JSON object
/// matching what the catalog surfaces historically wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product this line refers to. Unique within a cart.
    pub product_id: ProductId,
    /// Display name, captured at add-time.
    pub name: String,
    /// Unit price, captured at add-time. Non-negative. Persisted as a JSON
    /// number, matching the records earlier clients wrote.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Number of units. Always >= 1.
    pub quantity: u32,
    /// Stock-keeping unit, if the catalog provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Raw image bytes, base64-encoded, as served by the inventory API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    /// MIME type for `image_data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    /// Precomputed display URL, used when the caller already built one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Display URL for the line's image, if any image information exists.
    ///
    /// A precomputed URL wins; otherwise a `data:` URL is assembled from the
    /// raw bytes and MIME type.
    #[must_use]
    pub fn display_image_url(&self) -> Option<String> {
        if let Some(url) = &self.image_url {
            return Some(url.clone());
        }
        match (&self.image_data, &self.image_type) {
            (Some(data), Some(mime)) => Some(format!("data:{mime};base64,{data}")),
            _ => None,
        }
    }
}

/// An ordered collection of cart lines, keyed by product ID.
///
/// Invariant: no two lines share a `product_id`. Insertion order is preserved
/// for existing lines; new lines are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines currently in the cart, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add a line, merging by product ID.
    ///
    /// If a line with the same product already exists its quantity is
    /// incremented by `line.quantity` and every other field is left untouched
    /// (first add wins for name, price, sku, and image). Otherwise the line
    /// is appended verbatim.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// Unknown product IDs are a no-op (removal is a distinct operation, so
    /// this never creates or deletes lines). Values <= 0 are coerced to 1;
    /// quantities never reach zero through this path. Returns whether a line
    /// was changed.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) else {
            return false;
        };
        line.quantity = if quantity <= 0 {
            1
        } else {
            u32::try_from(quantity).unwrap_or(u32::MAX)
        };
        true
    }

    /// Remove the line with the given product ID, if present.
    ///
    /// Returns whether a line was removed. Unknown IDs are a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Order total: sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines (the nav badge number).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64, name: &str, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::from(price),
            quantity,
            sku: None,
            image_data: None,
            image_type: None,
            image_url: None,
        }
    }

    #[test]
    fn test_add_distinct_products_preserves_call_order() {
        let mut cart = Cart::new();
        cart.add(line(3, "Crate", 5, 1));
        cart.add(line(1, "Widget", 10, 2));
        cart.add(line(2, "Gadget", 7, 4));

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(cart.lines()[1].quantity, 2);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_add_same_product_merges_quantity_first_fields_win() {
        let mut cart = Cart::new();
        let mut first = line(1, "Widget", 10, 2);
        first.sku = Some("W-1".to_string());
        cart.add(first);

        let mut second = line(1, "Renamed Widget", 999, 3);
        second.sku = Some("W-9".to_string());
        cart.add(second);

        assert_eq!(cart.len(), 1);
        let merged = &cart.lines()[0];
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.name, "Widget");
        assert_eq!(merged.price, Decimal::from(10));
        assert_eq!(merged.sku.as_deref(), Some("W-1"));
    }

    #[test]
    fn test_set_quantity_coerces_zero_and_negative_to_one() {
        let mut cart = Cart::new();
        cart.add(line(1, "Widget", 10, 4));

        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert_eq!(cart.lines()[0].quantity, 1);

        assert!(cart.set_quantity(ProductId::new(1), -5));
        assert_eq!(cart.lines()[0].quantity, 1);

        assert!(cart.set_quantity(ProductId::new(1), 7));
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(line(1, "Widget", 10, 2));

        assert!(!cart.set_quantity(ProductId::new(99), 5));
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(line(1, "Widget", 10, 2));
        cart.add(line(2, "Gadget", 7, 1));

        assert!(cart.remove(ProductId::new(1)));
        assert!(cart.lines().iter().all(|l| l.product_id.as_i64() != 1));

        assert!(!cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(42)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear_empties_any_state() {
        let mut cart = Cart::new();
        cart.add(line(1, "Widget", 10, 2));
        cart.add(line(2, "Gadget", 7, 1));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_total_and_item_count() {
        let mut cart = Cart::new();
        cart.add(line(1, "Widget", 10, 2));
        cart.add(line(2, "Gadget", 7, 3));

        assert_eq!(cart.total(), Decimal::from(41));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_serde_roundtrip_is_lossless() {
        let mut cart = Cart::new();
        let mut widget = line(1, "Widget", 10, 2);
        widget.sku = Some("W-1".to_string());
        widget.image_data = Some("aGVsbG8=".to_string());
        widget.image_type = Some("image/png".to_string());
        cart.add(widget);
        cart.add(line(2, "Gadget", 7, 1));

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);

        // Re-saving the loaded value must not drift either.
        let json2 = serde_json::to_string(&back).expect("serialize again");
        assert_eq!(json2, json);
    }

    #[test]
    fn test_wire_format_is_camel_case_array() {
        let mut cart = Cart::new();
        cart.add(line(1, "Widget", 10, 2));

        let value = serde_json::to_value(&cart).expect("to_value");
        let entry = value
            .as_array()
            .and_then(|a| a.first())
            .expect("array with one entry");
        assert_eq!(entry["productId"], 1);
        assert_eq!(entry["name"], "Widget");
        assert_eq!(entry["quantity"], 2);
        // Price goes to the wire as a number, not a quoted decimal string
        assert!(entry["price"].is_number());
        assert_eq!(entry["price"], 10.0);
        assert!(entry.get("sku").is_none());
    }

    #[test]
    fn test_parses_record_with_numeric_prices() {
        let raw = r#"[{"productId": 1, "name": "Widget", "price": 10.5, "quantity": 2}]"#;
        let cart: Cart = serde_json::from_str(raw).expect("parse");
        assert_eq!(cart.lines()[0].price, Decimal::new(105, 1));
        assert_eq!(cart.total(), Decimal::new(210, 1));
    }

    #[test]
    fn test_display_image_url_prefers_precomputed() {
        let mut with_url = line(1, "Widget", 10, 1);
        with_url.image_url = Some("/img/w.png".to_string());
        with_url.image_data = Some("aGVsbG8=".to_string());
        with_url.image_type = Some("image/png".to_string());
        assert_eq!(with_url.display_image_url().as_deref(), Some("/img/w.png"));

        let mut with_bytes = line(2, "Gadget", 7, 1);
        with_bytes.image_data = Some("aGVsbG8=".to_string());
        with_bytes.image_type = Some("image/png".to_string());
        assert_eq!(
            with_bytes.display_image_url().as_deref(),
            Some("data:image/png;base64,aGVsbG8=")
        );

        assert!(line(3, "Bare", 1, 1).display_image_url().is_none());
    }
}
