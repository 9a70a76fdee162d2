//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "AUDIOBOT_CONFIG";

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/audiobot/`
/// - macOS: `~/Library/Application Support/audiobot/`
/// - Windows: `%APPDATA%\audiobot\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
///
/// `AUDIOBOT_CONFIG` takes precedence over the platform directory.
pub fn config_file_path() -> Result<PathBuf> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(config_dir()?.join("config.toml")),
    }
}
