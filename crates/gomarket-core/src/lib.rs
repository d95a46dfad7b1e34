//! # gomarket-core: Pure Cart Logic for GoMarketplace
//!
//! This crate holds the cart's data model and every cart rule as plain
//! functions over plain data. Storage and scheduling live in the crates
//! above it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     GoMarketplace Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (catalog, cart screen)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              gomarket-cart (CartStore, CartProvider)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gomarket-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   money   │  │   codec   │  │   │
//! │  │   │  Product  │  │   Cart    │  │   Money   │  │ JSON blob │  │   │
//! │  │   │ CartItem  │  │  Totals   │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO RUNTIME • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Product` and `CartItem`
//! - [`cart`] - The ordered cart and its add/increment/decrement rules
//! - [`money`] - Integer money for totals
//! - [`codec`] - The persisted JSON format
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gomarket_core::{Cart, Product};
//!
//! let shirt = Product::new("a", "Shirt", "https://img/shirt.png", 10.0);
//!
//! let mut cart = Cart::new();
//! cart.add(shirt.clone());
//! cart.add(shirt);
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.get("a").map(|item| item.quantity), Some(2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod codec;
pub mod error;
pub mod money;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals, Decrement};
pub use codec::{decode_cart, encode_cart};
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use types::{CartItem, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart blob lives under.
///
/// Existing installs already hold data under this exact key, so it must
/// not change.
pub const CART_STORAGE_KEY: &str = "@GoMarketplace-products";
