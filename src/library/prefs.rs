use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted preferences
const PREFS_FILE: &str = "prefs.json";

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Persisted user preferences, kept separate from the game collection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Preferences {
    /// Light/dark theme flag
    pub theme: Theme,
    /// Counter of add-game button clicks
    #[serde(default)]
    pub add_clicks: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            add_clicks: 0,
        }
    }
}

impl Preferences {
    fn prefs_path(data_dir: &Path) -> PathBuf {
        data_dir.join(PREFS_FILE)
    }

    /// Load preferences, falling back to defaults when none are stored
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Self::prefs_path(data_dir);

        if !path.exists() {
            info!("No preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json_str = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read preferences: {}", path.display()))?;

        let prefs = serde_json::from_str(&json_str)
            .with_context(|| format!("Failed to parse preferences: {}", path.display()))?;

        Ok(prefs)
    }

    /// Save preferences
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = Self::prefs_path(data_dir);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json_str = serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;

        fs::write(&path, json_str)
            .with_context(|| format!("Failed to write preferences: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_to_dark_theme() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.add_clicks, 0);
    }

    #[test]
    fn test_toggle_flips_theme() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_save_then_load_is_identity() {
        let dir = tempdir().unwrap();

        let prefs = Preferences {
            theme: Theme::Light,
            add_clicks: 7,
        };
        prefs.save(dir.path()).unwrap();

        let reloaded = Preferences::load(dir.path()).unwrap();
        assert_eq!(reloaded, prefs);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::load(dir.path()).unwrap();
        assert_eq!(prefs, Preferences::default());
    }
}
