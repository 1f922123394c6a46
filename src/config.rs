//! Tooling configuration
//!
//! Read from `concierge-data.json`. Every field has a default, so a missing
//! file yields the default configuration. A file that exists but does not
//! parse or validate is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Default configuration file name
pub const CONFIG_FILE: &str = "concierge-data.json";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where a loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// No file at the path
    Defaults,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::File => "file",
            ConfigSource::Defaults => "defaults",
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory `compile` writes artifacts to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./generated")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it does
    /// not exist.
    pub fn load(path: &Path) -> ConfigResult<(Self, ConfigSource)> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok((Self::default(), ConfigSource::Defaults));
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        Ok((Self::parse(&content)?, ConfigSource::File))
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.log_severity()?;
        Ok(())
    }

    pub fn log_severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }
}
