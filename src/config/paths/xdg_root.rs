//! XDG Base Directory utilities.

use crate::error::ApiError;
use std::path::PathBuf;

/// `$XDG_DATA_HOME`, else `$HOME/.local/share`.
pub fn data_home() -> Option<PathBuf> {
    if let Some(dir) = non_empty_var("XDG_DATA_HOME") {
        return Some(dir);
    }
    non_empty_var("HOME").map(|home| home.join(".local").join("share"))
}

/// Application data directory: `$XDG_DATA_HOME/lighthouse`.
pub fn data_dir() -> Result<PathBuf, ApiError> {
    data_home().map(|home| home.join("lighthouse")).ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine XDG data home directory (HOME not set)".to_string(),
        )
    })
}

/// `$XDG_CONFIG_HOME`, else `$HOME/.config`.
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Some(dir) = non_empty_var("XDG_CONFIG_HOME") {
        return Ok(dir);
    }
    non_empty_var("HOME")
        .map(|home| home.join(".config"))
        .ok_or_else(|| {
            ApiError::ConfigError(
                "Could not determine XDG config home directory (HOME not set)".to_string(),
            )
        })
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
