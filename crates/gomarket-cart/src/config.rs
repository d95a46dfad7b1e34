//! # Cart Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     GOMARKET_PERSIST_MODE=detached                                      │
//! │     GOMARKET_DB_PATH=/tmp/gomarket.db                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/gomarket/cart.toml (Linux)                                │
//! │     ~/Library/Application Support/com.gomarket.marketplace/cart.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     key "@GoMarketplace-products", queued writes, SQLite in data dir    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! storage_key = "@GoMarketplace-products"
//! persist_mode = "queued"   # queued | detached
//!
//! [storage]
//! backend = "sqlite"        # sqlite | memory
//! database_path = "/data/gomarket.db"
//! max_connections = 2
//! ```

use directories::ProjectDirs;
use gomarket_core::CART_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult};

// =============================================================================
// Persist Mode
// =============================================================================

/// How mutation snapshots reach storage.
///
/// ```text
/// QUEUED (default)                     DETACHED
/// ────────────────                     ────────
/// one background writer                one task per write
/// writes land in mutation order        overlapping writes race
/// waiting snapshots coalesce           every snapshot written
/// ```
///
/// Both are fire-and-forget for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    #[default]
    Queued,
    Detached,
}

impl std::fmt::Display for PersistMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistMode::Queued => write!(f, "queued"),
            PersistMode::Detached => write!(f, "detached"),
        }
    }
}

impl std::str::FromStr for PersistMode {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queued" | "ordered" => Ok(PersistMode::Queued),
            "detached" | "fire-and-forget" => Ok(PersistMode::Detached),
            other => Err(CartError::InvalidConfig(format!(
                "Unknown persist mode: '{}'. Valid options: queued, detached",
                other
            ))),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Which key-value backend holds the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite file on the device.
    #[default]
    Sqlite,

    /// Process memory; the cart does not survive a restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(CartError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

/// Storage backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite file. Defaults to `gomarket.db` in the platform data dir.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// SQLite pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    2
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            database_path: None,
            max_connections: default_max_connections(),
        }
    }
}

impl StorageSettings {
    /// The SQLite file to open: the configured path, else the platform
    /// data directory.
    pub fn resolve_database_path(&self) -> CartResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join("gomarket.db"))
            .ok_or_else(|| CartError::InvalidConfig("Could not determine app data directory".into()))
    }
}

// =============================================================================
// Main Cart Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the cart blob is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default)]
    pub persist_mode: PersistMode,

    #[serde(default)]
    pub storage: StorageSettings,
}

fn default_storage_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage_key: default_storage_key(),
            persist_mode: PersistMode::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl CartConfig {
    /// Config for an ephemeral, in-memory cart.
    pub fn in_memory() -> Self {
        CartConfig {
            storage: StorageSettings {
                backend: StorageBackend::Memory,
                ..StorageSettings::default()
            },
            ..CartConfig::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CartResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CartError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(CartError::InvalidConfig(
                "storage_key must not be empty".into(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(CartError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies `GOMARKET_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GOMARKET_STORAGE_KEY") {
            debug!(key = %key, "Overriding storage key from environment");
            self.storage_key = key;
        }

        if let Some(mode) = lookup("GOMARKET_PERSIST_MODE") {
            match mode.parse() {
                Ok(parsed) => self.persist_mode = parsed,
                Err(_) => warn!(mode = %mode, "Unknown persist mode in environment"),
            }
        }

        if let Some(backend) = lookup("GOMARKET_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => self.storage.backend = parsed,
                Err(_) => warn!(backend = %backend, "Unknown storage backend in environment"),
            }
        }

        if let Some(path) = lookup("GOMARKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "gomarket", "marketplace")
}
