// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::worker::available_workers;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum number of encoder processes running at once
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Exit non-zero when any file fails to convert
    #[serde(default)]
    pub fail_on_error: bool,

    /// Append encoder commands and stderr to jpegify.log in the current directory
    #[serde(default)]
    pub debug_log: bool,
}

fn default_max_workers() -> usize {
    available_workers()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            fail_on_error: false, // Per-file failures are only logged
            debug_log: false,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("jpegify")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("jpegify")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or use built-in defaults if there is none
    pub fn load() -> Result<Self> {
        let config_path = match Self::config_path() {
            Ok(path) => path,
            Err(_) => return Ok(Config::default()),
        };

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load config from an explicit path; the file must exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }
}
