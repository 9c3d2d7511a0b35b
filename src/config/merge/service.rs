//! MergeService: orchestrates sources, applies merge policy, deserializes to LighthouseConfig.

use crate::config::sources::{environment, global_file};
use crate::config::LighthouseConfig;
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<LighthouseConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Like [`MergeService::load`] with `path` in place of the global file.
    pub fn load_from_file(path: &Path) -> Result<LighthouseConfig, ConfigError> {
        debug!(path = %path.display(), "Loading configuration file");
        let builder = merge_policy::builder_with_defaults()?.add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }
}
