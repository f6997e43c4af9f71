//! Preference loading with precedence: environment variables override the
//! configuration file, which overrides built-in defaults.
//!
//! # Environment Variables
//! - `LOGOS_SYNC_OUTPUT_DIR`: Markdown output directory
//! - `LOGOS_SYNC_EXCLUDED_RESOURCES`: comma-separated resource ids
//! - `LOGOS_SYNC_INCLUDE_HIGHLIGHT_COLOR`: true/false
//! - `LOGOS_SYNC_READWISE_TOKEN`: Readwise API token
//! - `LOGOS_SYNC_SYNC_TO_READWISE`: true/false
//! - `LOGOS_SYNC_AUTO_SYNC`: true/false
//! - `LOGOS_SYNC_INTERVAL_MINUTES`: unattended sync interval

use crate::preferences::Preferences;
use std::env;
use std::path::{Path, PathBuf};

/// Preference loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {message}")]
    TomlParse { path: String, message: String },
}

/// Default configuration file location
/// (`<user config dir>/logos-sync/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logos-sync").join("config.toml"))
}

/// Load preferences from a TOML file.
pub fn load_from_toml(path: &Path) -> Result<Preferences, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| ConfigError::TomlParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load the effective preference snapshot.
///
/// Starts from defaults, overlays the configuration file when one exists
/// (the explicit `path`, or the default location), then overlays any
/// `LOGOS_SYNC_*` environment variables.
pub fn load(path: Option<&Path>) -> Result<Preferences, ConfigError> {
    let file = match path {
        Some(explicit) => Some(explicit.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let mut prefs = match file {
        Some(path) => load_from_toml(&path)?,
        None => Preferences::default(),
    };

    apply_env_overrides(&mut prefs);
    Ok(prefs)
}

/// Overlay `LOGOS_SYNC_*` environment variables onto `prefs`.
pub fn apply_env_overrides(prefs: &mut Preferences) {
    if let Ok(value) = env::var("LOGOS_SYNC_OUTPUT_DIR") {
        prefs.output_dir = value;
    }
    if let Ok(value) = env::var("LOGOS_SYNC_EXCLUDED_RESOURCES") {
        prefs.excluded_resources = value;
    }
    if let Some(value) = env_bool("LOGOS_SYNC_INCLUDE_HIGHLIGHT_COLOR") {
        prefs.include_highlight_color = value;
    }
    if let Ok(value) = env::var("LOGOS_SYNC_READWISE_TOKEN") {
        prefs.readwise_token = value;
    }
    if let Some(value) = env_bool("LOGOS_SYNC_SYNC_TO_READWISE") {
        prefs.sync_to_readwise = value;
    }
    if let Some(value) = env_bool("LOGOS_SYNC_AUTO_SYNC") {
        prefs.auto_sync_enabled = value;
    }
    if let Some(value) = env_u64("LOGOS_SYNC_INTERVAL_MINUTES") {
        prefs.sync_interval_minutes = value;
    }
}

fn env_bool(name: &str) -> Option<bool> {
    match env::var(name).ok()?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok()?.trim().parse().ok()
}
