//! Server configuration, read from a TOML file.
//!
//! ```toml
//! listen = "0.0.0.0:8080"
//! data_dir = "data"
//!
//! [product]
//! backend = "sqlite"
//! path = "data/products.db"
//!
//! [inventory]
//! backend = "memory"
//! ```
//!
//! Every key is optional. Products and inventory default to SQLite files
//! under `data_dir`; reviews are held in memory.

use std::path::{Path, PathBuf};
#[cfg(feature = "sqlite")]
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "sqlite")]
use crate::store::{InMemoryStore, RecordStore, SqlRecord, SqliteStore, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Where a service keeps its records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

/// Store settings for one service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Database file for the `sqlite` backend.
    /// Defaults to a file named after the service under `data_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory,
            path: None,
        }
    }

    pub fn sqlite() -> Self {
        Self {
            backend: Backend::Sqlite,
            path: None,
        }
    }

    /// The database file, falling back to `data_dir/default_file`.
    pub fn sqlite_path(&self, data_dir: &Path, default_file: &str) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir.join(default_file))
    }

    /// Open the configured store, creating the database directory if needed.
    #[cfg(feature = "sqlite")]
    pub fn open<M: SqlRecord>(
        &self,
        data_dir: &Path,
        default_file: &str,
    ) -> Result<Arc<dyn RecordStore<M>>, StoreError> {
        match self.backend {
            Backend::Memory => Ok(Arc::new(InMemoryStore::<M>::new())),
            Backend::Sqlite => {
                let path = self.sqlite_path(data_dir, default_file);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::Storage(format!("create {}: {e}", parent.display()))
                    })?;
                }
                Ok(Arc::new(SqliteStore::<M>::open(&path)?))
            }
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Listen address for the HTTP server.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Directory for database files without an explicit `path`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "StoreConfig::sqlite")]
    pub product: StoreConfig,

    #[serde(default = "StoreConfig::memory")]
    pub review: StoreConfig,

    #[serde(default = "StoreConfig::sqlite")]
    pub inventory: StoreConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            data_dir: default_data_dir(),
            product: StoreConfig::sqlite(),
            review: StoreConfig::memory(),
            inventory: StoreConfig::sqlite(),
        }
    }
}

impl ServiceConfig {
    /// Load and verify a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServiceConfig = toml::from_str(&content)?;
        config.verify()?;
        Ok(config)
    }

    /// Reject combinations the server cannot run.
    pub fn verify(&self) -> Result<(), ConfigError> {
        if self.listen.trim().is_empty() {
            return Err(ConfigError::Invalid("listen address must not be empty".into()));
        }
        if self.review.backend == Backend::Sqlite {
            return Err(ConfigError::Invalid(
                "reviews are documents; use backend = \"memory\" for [review]".into(),
            ));
        }
        Ok(())
    }
}
