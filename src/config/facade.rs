//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::LighthouseConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global config file, environment.
    pub fn load() -> Result<LighthouseConfig, ApiError> {
        Self::validated(MergeService::load()?)
    }

    /// Defaults, `path` in place of the global file, environment.
    pub fn load_from_file(path: &Path) -> Result<LighthouseConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Self::validated(MergeService::load_from_file(path)?)
    }

    /// `path` when given, the standard sources otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<LighthouseConfig, ApiError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    fn validated(config: LighthouseConfig) -> Result<LighthouseConfig, ApiError> {
        config.storage.validate()?;
        Ok(config)
    }
}
