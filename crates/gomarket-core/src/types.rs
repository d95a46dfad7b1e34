//! # Domain Types
//!
//! The two shapes the cart deals in.
//!
//! ```text
//! ┌─────────────────────┐          ┌─────────────────────┐
//! │      Product        │  add ──► │      CartItem       │
//! │  ─────────────────  │          │  ─────────────────  │
//! │  id                 │          │  id (unique in cart)│
//! │  title              │          │  title              │
//! │  image_url          │          │  image_url          │
//! │  price              │          │  price              │
//! │                     │          │  quantity (>= 1)    │
//! └─────────────────────┘          └─────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are serialized exactly as written here (`image_url` stays
//! snake_case). Carts persisted by earlier app versions use these names.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product as the UI hands it to the cart (no quantity yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier; the cart's unique key.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Product image URL.
    pub image_url: String,

    /// Unit price in major currency units, as sent by the catalog API.
    pub price: f64,
}

impl Product {
    /// Creates a product descriptor.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Product {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One cart line: a product plus how many of it are in the cart.
///
/// ## Invariant
/// `quantity` is never 0 inside a [`Cart`](crate::Cart). A line whose
/// quantity would drop to zero is removed instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a line for a product that is not in the cart yet.
    pub fn from_product(product: Product) -> Self {
        CartItem {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }

    /// Returns the product descriptor of this line, without the quantity.
    pub fn product(&self) -> Product {
        Product {
            id: self.id.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
        }
    }

    /// Unit price converted to integer money.
    pub fn unit_price(&self) -> Money {
        Money::from_price(self.price)
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(i64::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_starts_at_one() {
        let item = CartItem::from_product(Product::new("a", "Shirt", "u", 10.0));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.product(), Product::new("a", "Shirt", "u", 10.0));
    }

    #[test]
    fn test_line_total() {
        let mut item = CartItem::from_product(Product::new("a", "Mug", "u", 19.9));
        item.quantity = 3;
        assert_eq!(item.line_total().cents(), 5970);
    }

    #[test]
    fn test_image_url_stays_snake_case() {
        let item = CartItem::from_product(Product::new("a", "Shirt", "u", 10.0));
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("image_url").is_some());
        assert!(json.get("imageUrl").is_none());
    }
}
