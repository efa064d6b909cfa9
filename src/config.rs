//! User configuration and preferences

use crate::domain::{DEFAULT_QUEUE_SIZE, PAGE_SIZE};
use crate::error::{PicPurgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    pub welcome_shown: bool,
    /// Photos kept ready ahead of the one on screen
    pub queue_size: usize,
    /// Assets fetched per page while walking the library
    pub page_size: usize,
    /// Versions document consulted by the update check
    pub versions_file: Option<PathBuf>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            welcome_shown: false,
            queue_size: DEFAULT_QUEUE_SIZE,
            page_size: PAGE_SIZE,
            versions_file: None,
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/picpurge/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("picpurge").join("config.json"))
    }

    /// Load config from file, or create default if doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            PicPurgeError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            PicPurgeError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            PicPurgeError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            PicPurgeError::ConfigError("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PicPurgeError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PicPurgeError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            PicPurgeError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_size == 0 {
            return Err(PicPurgeError::ConfigError(
                "queue_size must be at least 1".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(PicPurgeError::ConfigError(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
