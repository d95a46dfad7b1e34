//! # Key-Value Repository
//!
//! SQLite implementation of [`KeyValueStore`] over the `key_value` table.
//!
//! ```text
//! ┌──────────────────────────┬────────────────────────────┬──────────────────────┐
//! │ key (PK)                 │ value                      │ updated_at           │
//! ├──────────────────────────┼────────────────────────────┼──────────────────────┤
//! │ @GoMarketplace-products  │ [{"id":"a",...}]           │ 2026-10-19T12:00:00Z │
//! └──────────────────────────┴────────────────────────────┴──────────────────────┘
//! ```
//!
//! `set_item` is a single upsert, so a value is always replaced whole.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StorageResult;
use crate::store::KeyValueStore;

/// Repository for the `key_value` table.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }
}

#[async_trait]
impl KeyValueStore for KeyValueRepository {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM key_value WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Read key");
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO key_value (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> KeyValueRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().key_values()
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let repo = repo().await;
        assert_eq!(repo.get_item("@GoMarketplace-products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let repo = repo().await;
        repo.set_item("k", r#"[{"id":"a"}]"#).await.unwrap();

        assert_eq!(
            repo.get_item("k").await.unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_whole_value() {
        let repo = repo().await;
        repo.set_item("k", "first, longer value").await.unwrap();
        repo.set_item("k", "2nd").await.unwrap();

        assert_eq!(repo.get_item("k").await.unwrap().as_deref(), Some("2nd"));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM key_value")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let repo = repo().await;
        repo.set_item("a", "1").await.unwrap();
        repo.set_item("b", "2").await.unwrap();

        assert_eq!(repo.get_item("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(repo.get_item("b").await.unwrap().as_deref(), Some("2"));
    }
}
