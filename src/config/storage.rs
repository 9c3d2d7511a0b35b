//! StorageConfig and store path resolution.

use super::merge::merge_policy::{DEFAULT_BATCH_SIZE, DEFAULT_CONNECT_TIMEOUT_SECS};
use super::xdg;
use crate::error::ApiError;
use crate::store::StoreBackend;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Store location; `None` resolves under the XDG data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Records per insert transaction during populate.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            batch_size: DEFAULT_BATCH_SIZE,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl StorageConfig {
    /// Configured path, or the backend's default under `$XDG_DATA_HOME/lighthouse`.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let dir = xdg::data_dir()?;
        Ok(match self.backend {
            StoreBackend::Sled => dir.join("store"),
            StoreBackend::Sqlite => dir.join("lighthouse.db"),
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.batch_size == 0 {
            return Err(ApiError::ConfigError(
                "storage.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
