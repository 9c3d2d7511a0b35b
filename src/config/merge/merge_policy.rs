//! Built-in defaults, the lowest-precedence layer.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Builder pre-seeded with every default that a file or env var may override.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("storage.backend", "sled")?
        .set_default("storage.batch_size", DEFAULT_BATCH_SIZE as u64)?
        .set_default("storage.connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS)?
        .set_default("scan.follow_symlinks", false)?
        .set_default("scan.skip_hidden", true)
}
