//! # gomarket-cart: The GoMarketplace Cart Store
//!
//! The shopping cart the marketplace UI reads and mutates. Holds the cart in
//! memory, restores it from device storage at startup, and writes every change
//! back in the background.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GoMarketplace Cart                               │
//! │                                                                         │
//! │  UI views                                                               │
//! │       │  use_cart() / injected CartStore                                │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  gomarket-cart (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  CartProvider ──► CartStore ──► Persister ──► KeyValueStore     │   │
//! │  │                     │  ▲                                        │   │
//! │  │          watch<Arc<Cart>>  hydration (once, at open)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  gomarket-core (cart math, JSON)    gomarket-storage (SQLite / memory)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `CartStore`: snapshot, mutations, hydration
//! - [`persist`] - Background snapshot writes
//! - [`provider`] - `CartProvider` scope and `use_cart()`
//! - [`config`] - TOML/env configuration
//! - [`error`] - Cart error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_cart::{init_tracing, CartConfig, CartStore};
//! use gomarket_core::Product;
//!
//! init_tracing();
//! let config = CartConfig::load_or_default(None);
//! let cart = CartStore::connect(&config).await?;
//!
//! cart.add_to_cart(Product::new("42", "Mug", "https://img/42.png", 9.9));
//! println!("{} items, {}", cart.products().len(), cart.totals().subtotal);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
mod persist;
pub mod provider;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CartConfig, PersistMode, StorageBackend, StorageSettings};
pub use error::{CartError, CartResult};
pub use provider::{use_cart, CartProvider};
pub use store::{CartStatus, CartStore};

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gomarket_cart=trace` - Show trace for the cart only
/// - Default: `info,gomarket=debug,sqlx=warn`
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gomarket=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
