//! `blsettings.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use blsettings_appearance::FALLBACK_DPI;
use blsettings_types::error::{BlsettingsError, Result};

/// Overrides the configuration file location.
pub const CONFIG_ENV: &str = "BLSETTINGS_CONFIG";

/// Command-line tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding every channel.
    pub store_path: PathBuf,
    /// DPI reported when a screen has no physical size.
    pub fallback_dpi: i32,
    /// Debug domains, same syntax as `BLSETTINGS_DEBUG`.
    pub debug: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_data_dir().join("channels.json"),
            fallback_dpi: FALLBACK_DPI,
            debug: String::new(),
        }
    }
}

fn xdg_dir(var: &str, fallback: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(fallback)))
}

fn default_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
        .map(|d| d.join("blade-settings"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `$BLSETTINGS_CONFIG`, else `$XDG_CONFIG_HOME/blade-settings/blsettings.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("blade-settings").join("blsettings.toml"))
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BlsettingsError::Config(format!("blsettings.toml: {e}")))
    }

    /// Load `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load from [`config_path`].
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }
}
