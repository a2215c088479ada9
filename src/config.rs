//! Application Configuration
//!
//! Loaded from `<config_dir>/trip-planner/config.toml`. Every field has a
//! default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use rolling_logger::LogOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trip_core::Language;

pub const APP_DIR_NAME: &str = "trip-planner";
pub const IN_MEMORY_DB: &str = ":memory:";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the database and logs
    pub data_dir: Option<PathBuf>,
    /// Database file name inside `data_dir`, or `:memory:`
    pub db_file: String,
    /// Language used until the user picks one
    pub default_language: Language,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Defaults to `<data_dir>/logs`
    pub dir: Option<PathBuf>,
    pub max_file_bytes: u64,
    pub max_files: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_file: "trip_planner.db".to_string(),
            default_language: Language::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let options = LogOptions::default();
        Self {
            level: options.level,
            dir: None,
            max_file_bytes: options.max_file_bytes,
            max_files: options.max_files,
        }
    }
}

impl AppConfig {
    /// Returns the path to the configuration file.
    ///
    /// Falls back to the current directory if the platform config dir is
    /// unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join(APP_DIR_NAME).join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `AppConfig::default()`.
    /// - Otherwise parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_file.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "db_file must not be empty".to_string(),
            });
        }

        if self.log.max_files == 0 {
            return Err(ConfigError::ValidationError {
                message: "log.max_files must be at least 1".to_string(),
            });
        }

        if self.log.max_file_bytes == 0 {
            return Err(ConfigError::ValidationError {
                message: "log.max_file_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
        })
    }

    pub fn uses_memory_db(&self) -> bool {
        self.db_file == IN_MEMORY_DB
    }

    pub fn db_path(&self) -> PathBuf {
        if self.uses_memory_db() {
            PathBuf::from(IN_MEMORY_DB)
        } else {
            self.data_dir().join(&self.db_file)
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("logs"))
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log.level.clone(),
            max_file_bytes: self.log.max_file_bytes,
            max_files: self.log.max_files,
        }
    }
}
