//! # Repository Module
//!
//! SQLite-backed repositories. Each repository owns a cloned pool handle
//! (cheap, reference-counted) and exposes typed operations over one table.
//!
//! ```text
//! Database::key_values() ──► KeyValueRepository ──► key_value table
//! ```

pub mod key_value;
