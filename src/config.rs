//! Configuration
//!
//! Layered with the `config` crate. Lowest to highest precedence: built-in
//! defaults, the global `config.toml` (or an explicit file), then
//! `LIGHTHOUSE__SECTION__KEY` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage::StorageConfig;

use crate::logging::LoggingConfig;
use crate::walker::WalkerConfig;
use serde::{Deserialize, Serialize};

/// Directory scan behaviour.
pub type ScanConfig = WalkerConfig;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LighthouseConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
