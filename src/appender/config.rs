//!
//! Appender configuration, loaded from JSON
//!

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::appender::console::DEFAULT_FORMAT;
use crate::appender::error::ConfigError;
use crate::appender::record::LogLevel;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppenderConfig {
    pub format: String,
    pub ignore_environment_pattern: bool,
    pub details_level: LogLevel,
}

impl AppenderConfig {
    pub fn load_from_file(file_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_data = fs::read_to_string(file_path)?;
        let config: AppenderConfig = serde_json::from_str(&config_data)?;

        Ok(config)
    }

    /// Loads `file_path` if it exists, otherwise falls back to the defaults.
    pub fn load_or_default(file_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if file_path.as_ref().exists() {
            Self::load_from_file(file_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, file_path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(file_path, data)?;

        Ok(())
    }

    /// `<config dir>/console-appender/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("console-appender").join("config.json"))
    }
}

impl Default for AppenderConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            ignore_environment_pattern: false,
            details_level: LogLevel::Trace,
        }
    }
}
