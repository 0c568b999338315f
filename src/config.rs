//! Optional user configuration for marginalia
//!
//! Defaults for the CLI flags can be kept in a small TOML file in the
//! platform config directory. Flags given on the command line always win
//! over values from the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ExportFormat;

/// User configuration; every field is optional so the file can set only
/// what it cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub format: Option<ExportFormat>,
    pub include_author: Option<bool>,
    pub include_date: Option<bool>,
    pub keep_empty: Option<bool>,
}

impl Config {
    /// Load configuration from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_path(&config_path);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Load configuration from an explicit file path
    pub fn load_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("marginalia").join("config.toml"))
    }
}
