//! # Key-Value Store Trait
//!
//! The storage seam the cart persists through, shaped like a mobile
//! platform's async local storage: string keys, string values, whole-value
//! overwrites.

use async_trait::async_trait;

use crate::error::StorageResult;

/// Async string key-value storage.
///
/// Implementations must be shareable across tasks; the cart holds one as
/// `Arc<dyn KeyValueStore>` and writes from background tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}
