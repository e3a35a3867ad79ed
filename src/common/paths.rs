//! Configuration paths
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/spoiler-check/`
//! - macOS: `~/Library/Application Support/spoiler-check/`
//! - Windows: `%APPDATA%\spoiler-check\`

use std::path::PathBuf;

const APP_NAME: &str = "spoiler-check";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
