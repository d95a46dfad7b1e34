//! # Storage Error Types
//!
//! Error types for key-value storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module) ← Adds context and categorization           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartError (gomarket-cart) ← Only at startup; background writes        │
//! │                               log and drop their errors                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StorageError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StorageError::PoolExhausted
/// sqlx::Error::PoolClosed     → StorageError::ConnectionFailed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,

            sqlx::Error::PoolClosed => {
                StorageError::ConnectionFailed("Pool is closed".to_string())
            }

            _ => StorageError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            StorageError::from(sqlx::Error::PoolTimedOut),
            StorageError::PoolExhausted
        ));
        assert!(matches!(
            StorageError::from(sqlx::Error::PoolClosed),
            StorageError::ConnectionFailed(_)
        ));
    }
}
