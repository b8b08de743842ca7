//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{APP_NAME, CONFIG_DIR_ENV, VIDEO_MAPS_DIR};
use crate::models::ProfileDefaults;

/// Folder under the source root that holds exported facility documents.
pub const SOURCE_DOCUMENTS_DIR: &str = "ARTCCs";

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Root of the source client's data folder (holds `ARTCCs/` and `VideoMaps/`)
    pub source_root: Option<PathBuf>,
    /// Root folder of radar-scope profiles
    pub profiles_dir: Option<PathBuf>,
    /// Weather radar station table replacing the bundled one
    pub stations_file: Option<PathBuf>,
    /// Airport CSV (OurAirports layout) replacing the bundled one
    pub airports_file: Option<PathBuf>,
}

impl PathConfig {
    /// Folder of exported facility documents (`{source_root}/ARTCCs`).
    pub fn source_documents_dir(&self) -> Option<PathBuf> {
        self.source_root.as_ref().map(|r| r.join(SOURCE_DOCUMENTS_DIR))
    }

    /// Folder of map assets (`{source_root}/VideoMaps`).
    pub fn video_maps_dir(&self) -> Option<PathBuf> {
        self.source_root.as_ref().map(|r| r.join(VIDEO_MAPS_DIR))
    }
}

/// Application configuration.
///
/// Stored as TOML in the platform config directory:
/// - Linux: `~/.config/ScopeGen/config.toml`
/// - macOS: `~/Library/Application Support/ScopeGen/config.toml`
/// - Windows: `%APPDATA%\ScopeGen\config.toml`
///
/// Set `SCOPEGEN_CONFIG_DIR` to use another directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// File system paths
    pub paths: PathConfig,
    /// Defaults overlaid onto generated profiles
    pub defaults: ProfileDefaults,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the config directory path, honouring `SCOPEGEN_CONFIG_DIR`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        Self::from_toml(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = Self::config_file_path()?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - configured directories exist
    /// - the station and airport table files exist (if set)
    /// - the default font size is within 4-72 (if set)
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.paths.source_root {
            if !root.is_dir() {
                anyhow::bail!("Source root does not exist: {}", root.display());
            }
        }

        if let Some(dir) = &self.paths.profiles_dir {
            if !dir.is_dir() {
                anyhow::bail!("Profiles directory does not exist: {}", dir.display());
            }
        }

        if let Some(file) = &self.paths.stations_file {
            if !file.is_file() {
                anyhow::bail!("Station table not found: {}", file.display());
            }
        }

        if let Some(file) = &self.paths.airports_file {
            if !file.is_file() {
                anyhow::bail!("Airport table not found: {}", file.display());
            }
        }

        if let Some(size) = self.defaults.font_size {
            if !(4..=72).contains(&size) {
                anyhow::bail!("Default font size must be between 4 and 72 (got {size})");
            }
        }

        Ok(())
    }
}
