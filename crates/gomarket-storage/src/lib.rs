//! # gomarket-storage: Key-Value Persistence for GoMarketplace
//!
//! The cart persists one JSON blob under one key. This crate provides the
//! async key-value seam it writes through and the backends behind it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GoMarketplace Data Flow                          │
//! │                                                                         │
//! │  CartStore (gomarket-cart)                                              │
//! │       │  get_item / set_item                                            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  gomarket-storage (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │ KeyValueStore │◄───│ KeyValueRepository │  │ Migrations │  │   │
//! │  │   │   (trait)     │    │ (SQLite, pool.rs)  │  │ (embedded) │  │   │
//! │  │   │               │◄───│ MemoryStore        │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <app data dir>/gomarket.db, table key_value                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `KeyValueStore` trait
//! - [`pool`] - SQLite connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite-backed `KeyValueStore`
//! - [`memory`] - In-process `KeyValueStore`
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_storage::{Database, DbConfig, KeyValueStore};
//!
//! let db = Database::new(DbConfig::new("path/to/gomarket.db")).await?;
//! let store = db.key_values();
//!
//! store.set_item("@GoMarketplace-products", "[]").await?;
//! let raw = store.get_item("@GoMarketplace-products").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig, DbLocation};
pub use repository::key_value::KeyValueRepository;
pub use store::KeyValueStore;
