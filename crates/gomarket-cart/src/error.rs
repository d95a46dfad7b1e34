//! # Cart Error Type
//!
//! Errors the host application can see from the cart crate.
//!
//! ## What Surfaces and What Doesn't
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Error Handling                                  │
//! │                                                                         │
//! │  Scope misuse        use_cart() outside a CartProvider                  │
//! │                      ──► CartError::MissingProvider (returned at once)  │
//! │                                                                         │
//! │  Startup problems    bad config, no runtime, database won't open        │
//! │                      ──► CartError from CartStore::connect / open       │
//! │                                                                         │
//! │  Hydration failure   blob missing, malformed or unreadable              │
//! │                      ──► logged, cart starts empty                      │
//! │                                                                         │
//! │  Write failure       background set_item fails                          │
//! │                      ──► logged, never retried, never returned          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gomarket_storage::StorageError;
use thiserror::Error;

/// Cart store errors.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was requested outside any provider scope.
    ///
    /// This is a programming error in the caller: wrap the code in
    /// `CartProvider::scope` or pass the `CartStore` in directly.
    #[error("use_cart must be used within a CartProvider")]
    MissingProvider,

    /// The store was opened outside a tokio runtime.
    #[error("CartStore must be opened from within a tokio runtime")]
    NoRuntime,

    /// Configuration is invalid.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be saved.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error (config file, data directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML.
    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for cart operations.
pub type CartResult<T> = Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_provider_message() {
        assert_eq!(
            CartError::MissingProvider.to_string(),
            "use_cart must be used within a CartProvider"
        );
    }

    #[test]
    fn test_storage_error_converts() {
        let err: CartError = StorageError::PoolExhausted.into();
        assert!(matches!(err, CartError::Storage(_)));
    }
}
