//! # Cart
//!
//! The ordered list of cart lines and the three rules that change it.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  add(product)                                                           │
//! │    ├── id already in cart ──► quantity + 1 (position unchanged)         │
//! │    └── new id ──────────────► push CartItem { quantity: 1 }             │
//! │                                                                         │
//! │  increment(id)                                                          │
//! │    ├── unknown id ──────────► None (nothing changed)                    │
//! │    └── found ───────────────► quantity + 1                              │
//! │                                                                         │
//! │  decrement(id)                                                          │
//! │    ├── unknown id ──────────► None (nothing changed)                    │
//! │    ├── quantity <= 1 ───────► line removed                              │
//! │    └── quantity > 1 ────────► quantity - 1                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every line has `quantity >= 1`
//! - Lines keep the order in which their product was first added

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, Product};

/// What a [`Cart::decrement`] did to the line.
#[derive(Debug, Clone, PartialEq)]
pub enum Decrement {
    /// The line is still there with this quantity.
    Decremented(u32),

    /// The line was at quantity 1 (or less) and is gone.
    Removed(CartItem),
}

/// The shopping cart.
///
/// Serializes as a bare JSON array of [`CartItem`], the persisted format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from existing lines, checking the invariants.
    ///
    /// ## Errors
    /// `CoreError::InvalidCart` if an id appears twice or a line has
    /// quantity 0.
    pub fn from_items(items: Vec<CartItem>) -> CoreResult<Self> {
        {
            let mut seen = HashSet::with_capacity(items.len());
            for item in &items {
                if item.quantity == 0 {
                    return Err(CoreError::InvalidCart {
                        reason: format!("product {} has quantity 0", item.id),
                    });
                }
                if !seen.insert(item.id.as_str()) {
                    return Err(CoreError::InvalidCart {
                        reason: format!("product {} appears more than once", item.id),
                    });
                }
            }
        }
        Ok(Cart { items })
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a line by product id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Adds one unit of `product`. Returns the line's new quantity.
    ///
    /// An existing line keeps its stored title, image and price; only the
    /// quantity moves.
    pub fn add(&mut self, product: Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }

        self.items.push(CartItem::from_product(product));
        1
    }

    /// Adds one unit to an existing line.
    ///
    /// Returns the new quantity, or `None` if `id` is not in the cart.
    pub fn increment(&mut self, id: &str) -> Option<u32> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Removes one unit from an existing line, dropping the line at zero.
    ///
    /// Returns `None` if `id` is not in the cart.
    pub fn decrement(&mut self, id: &str) -> Option<Decrement> {
        let index = self.items.iter().position(|item| item.id == id)?;

        if self.items[index].quantity <= 1 {
            return Some(Decrement::Removed(self.items.remove(index)));
        }

        let item = &mut self.items[index];
        item.quantity -= 1;
        Some(Decrement::Decremented(item.quantity))
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// Cart summary shown on the cart screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CartTotals {
    /// Distinct lines.
    pub item_count: usize,

    /// Units across all lines.
    pub total_quantity: u64,

    /// Σ price × quantity.
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> Product {
        Product::new(id, format!("Product {}", id), format!("https://img/{}.png", id), price)
    }

    fn quantities(cart: &Cart) -> Vec<(&str, u32)> {
        cart.iter().map(|i| (i.id.as_str(), i.quantity)).collect()
    }

    #[test]
    fn test_add_new_product_appends_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.add(product("b", 5.0));

        assert_eq!(quantities(&cart), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_add_existing_product_increases_quantity_in_place() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.add(product("b", 5.0));

        assert_eq!(cart.add(product("a", 10.0)), 2);
        assert_eq!(quantities(&cart), vec![("a", 2), ("b", 1)]);
    }

    #[test]
    fn test_add_existing_keeps_stored_fields() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.add(Product::new("a", "Renamed", "other", 99.0));

        let item = cart.get("a").unwrap();
        assert_eq!(item.title, "Product a");
        assert_eq!(item.price, 10.0);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_increment() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));

        assert_eq!(cart.increment("a"), Some(2));
        assert_eq!(cart.increment("missing"), None);
        assert_eq!(quantities(&cart), vec![("a", 2)]);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.add(product("b", 5.0));

        let removed = cart.decrement("a");
        assert!(matches!(removed, Some(Decrement::Removed(ref item)) if item.id == "a"));
        assert_eq!(quantities(&cart), vec![("b", 1)]);
    }

    #[test]
    fn test_decrement_above_one() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.add(product("a", 10.0));

        assert_eq!(cart.decrement("a"), Some(Decrement::Decremented(1)));
        assert_eq!(cart.decrement("missing"), None);
        assert_eq!(quantities(&cart), vec![("a", 1)]);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(product("a", 19.9));
        cart.add(product("a", 19.9));
        cart.add(product("b", 0.1));

        let totals = cart.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal.cents(), 3990);
    }

    #[test]
    fn test_from_items_rejects_duplicates_and_zero() {
        let mut a = CartItem::from_product(product("a", 1.0));
        assert!(Cart::from_items(vec![a.clone(), a.clone()]).is_err());

        a.quantity = 0;
        assert!(Cart::from_items(vec![a]).is_err());
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["quantity"], 1);
    }
}
