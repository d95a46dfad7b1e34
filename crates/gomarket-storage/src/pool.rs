//! # SQLite Pool
//!
//! Opens the SQLite file that backs device storage and hands out
//! [`KeyValueRepository`] handles over it.
//!
//! ```text
//! DbConfig::new(path) ──► Database::new(config).await ──► db.key_values()
//!                          │ open / create file            │
//!                          │ WAL journal (files only)      └─► KeyValueRepository
//!                          └ apply migrations                  (shares the pool)
//! ```
//!
//! The cart touches storage rarely (one read at startup, one write per
//! mutation), so the pool stays small: one connection for the hydration
//! read, one for the background writer.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::migrations;
use crate::repository::key_value::KeyValueRepository;

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A file on disk, created on first open.
    File(PathBuf),

    /// A private in-memory database. Gone once the pool closes.
    Memory,
}

/// Settings for [`Database::new`].
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Pool size. Default: 2.
    pub max_connections: u32,

    /// How long to wait for a free connection. Default: 30 seconds.
    pub acquire_timeout: Duration,

    /// Apply embedded migrations after connecting. Default: true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// In-memory database, mainly for tests.
    ///
    /// Every SQLite connection to `:memory:` gets its own database, so the
    /// pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == DbLocation::Memory
    }

    /// The database file, if there is one.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path),
            DbLocation::Memory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            DbLocation::Memory => SqliteConnectOptions::new().in_memory(true),
        }
    }

    fn pool_size(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }
}

/// An open SQLite pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database described by `config`, creating the file and
    /// applying migrations as configured.
    pub async fn new(config: DbConfig) -> StorageResult<Self> {
        match config.path() {
            Some(path) => info!(path = %path.display(), "Opening cart database"),
            None => info!("Opening in-memory cart database"),
        }

        let max_connections = config.pool_size();
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            // Connections are never recycled: an in-memory database would vanish with them.
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections, "SQLite pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies any pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> StorageResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Key-value access over this pool.
    pub fn key_values(&self) -> KeyValueRepository {
        KeyValueRepository::new(self.pool.clone())
    }

    /// Closes every connection. Repositories made from this pool fail
    /// afterwards.
    pub async fn close(&self) {
        info!("Closing cart database");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;

    #[tokio::test]
    async fn test_memory_database_is_healthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[test]
    fn test_config_locations() {
        let file = DbConfig::new("/tmp/gomarket.db").max_connections(4).run_migrations(false);
        assert_eq!(file.path(), Some(Path::new("/tmp/gomarket.db")));
        assert_eq!(file.pool_size(), 4);
        assert!(!file.run_migrations);

        let memory = DbConfig::in_memory().max_connections(4);
        assert!(memory.is_in_memory());
        assert_eq!(memory.path(), None);
        assert_eq!(memory.pool_size(), 1);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gomarket.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.key_values().set_item("k", "v").await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            reopened.key_values().get_item("k").await.unwrap().as_deref(),
            Some("v")
        );
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }
}
