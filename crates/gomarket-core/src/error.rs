//! # Error Types
//!
//! Domain-specific error types for gomarket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gomarket-core errors (this file)                                       │
//! │  └── CoreError        - Cart encode/decode failures                     │
//! │                                                                         │
//! │  gomarket-storage errors (separate crate)                               │
//! │  └── StorageError     - Key-value storage failures                      │
//! │                                                                         │
//! │  gomarket-cart errors                                                   │
//! │  └── CartError        - Scope misuse, config, wraps the two above       │
//! │                                                                         │
//! │  Flow: CoreError / StorageError → CartError → host application          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart rules themselves never fail: adding a duplicate is an
//! increment and touching an unknown id is a no-op. Errors only come from
//! turning a cart into bytes and back.

use thiserror::Error;

/// Core cart errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The persisted blob is not a JSON array of cart lines.
    #[error("Malformed cart data: {0}")]
    MalformedCart(serde_json::Error),

    /// The blob parsed but breaks a cart invariant.
    ///
    /// ## When This Occurs
    /// - The same product id appears on two lines
    /// - A line has quantity 0
    #[error("Invalid cart data: {reason}")]
    InvalidCart { reason: String },

    /// The cart could not be serialized.
    #[error("Failed to encode cart: {0}")]
    EncodeFailed(serde_json::Error),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidCart {
            reason: "product a appears more than once".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid cart data: product a appears more than once"
        );
    }
}
