//! Layered catalog configuration.
//!
//! Sources, highest priority first:
//! 1. `BOOKCAT_*` environment variables (`BOOKCAT_STORE_LOCATION`,
//!    `BOOKCAT_CATALOG_NAME`, `BOOKCAT_LOG_LEVEL`, `BOOKCAT_LOG_DIR`)
//! 2. `bookcat.toml` in the working directory
//! 3. Built-in defaults
//!
//! The core never reads these values itself; adapters load a
//! [`CatalogConfig`], open the store it names and hand the connection in.

use crate::db::{open_db, open_db_in_memory, DbResult};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const ENV_PREFIX: &str = "BOOKCAT_";
const CONFIG_FILE: &str = "bookcat.toml";
const MEMORY_LOCATION: &str = ":memory:";
const DB_FILE_EXTENSION: &str = "sqlite3";

/// Configuration loading or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    Figment(Box<figment::Error>),
    /// A field holds a value the catalog cannot use.
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Figment(err) => write!(f, "configuration error: {err}"),
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid configuration value for `{field}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Figment(err) => Some(err.as_ref()),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}

/// Where the catalog lives and how the process logs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Directory holding catalog files, or `:memory:` for a private
    /// in-memory store.
    pub store_location: String,
    /// Logical catalog name; selects `<catalog_name>.sqlite3`.
    pub catalog_name: String,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Absolute log directory. Logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            store_location: ".".to_string(),
            catalog_name: "library".to_string(),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Resolved store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    File(PathBuf),
}

impl StoreTarget {
    /// Opens and migrates the targeted store.
    pub fn open(&self) -> DbResult<Connection> {
        match self {
            Self::Memory => open_db_in_memory(),
            Self::File(path) => open_db(path),
        }
    }
}

impl CatalogConfig {
    /// Loads configuration from defaults, `bookcat.toml` and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// Loads `.env` (when present) before [`CatalogConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Provider chain used by [`CatalogConfig::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Resolves the configured store location.
    ///
    /// # Errors
    /// - `InvalidValue` when the catalog name is blank or contains a path
    ///   separator, or the store location is blank.
    pub fn store_target(&self) -> Result<StoreTarget, ConfigError> {
        let location = self.store_location.trim();
        if location.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store_location",
                reason: "must not be empty".to_string(),
            });
        }
        if location == MEMORY_LOCATION {
            return Ok(StoreTarget::Memory);
        }

        let name = self.catalog_name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog_name",
                reason: "must not be empty".to_string(),
            });
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "catalog_name",
                reason: format!("`{name}` must not contain path separators"),
            });
        }

        Ok(StoreTarget::File(
            PathBuf::from(location).join(format!("{name}.{DB_FILE_EXTENSION}")),
        ))
    }
}
