//! Global config file: `$XDG_CONFIG_HOME/lighthouse/config.toml`, optional.

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::PathBuf;

pub fn path() -> Option<PathBuf> {
    xdg::config_home()
        .ok()
        .map(|home| home.join("lighthouse").join("config.toml"))
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(match path() {
        Some(path) => builder.add_source(File::from(path).required(false)),
        None => builder,
    })
}
