use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Local paths configuration
    pub paths: PathsConfig,
}

/// Local paths configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PathsConfig {
    /// Directory for the game collection, preferences and cover cache
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            paths: PathsConfig {
                data_dir: dirs::data_dir()
                    .unwrap_or_else(|| home_dir.join(".local").join("share"))
                    .join("game-shelf"),
            },
        }
    }
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("game-shelf")
            .join("config.toml")
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&config_str)?;

        info!("Configuration loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let config_str = toml::to_string(self)?;
        fs::write(&config_path, config_str)?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }

    /// Ensure all configured directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.paths.data_dir, &self.paths.data_dir.join("covers")] {
            if !dir.exists() {
                info!("Creating directory: {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }

        Ok(())
    }
}
