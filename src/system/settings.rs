use std::{fs, path::Path};

use crate::models::Settings;
use thiserror::Error;

/// Failures while loading `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        /// The config file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for `Settings`.
    #[error("Invalid config file '{path}': {source}")]
    Parse {
        /// The config file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },
    /// The prefix would never match a whitespace-split line.
    #[error("The command prefix cannot contain whitespace.")]
    InvalidPrefix,
}

/// Loads `config.toml`. A missing file yields the default settings.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        log::debug!("No config file at '{}', using defaults.", path.display());
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let settings: Settings = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    validate(&settings)?;
    Ok(settings)
}

/// Checks settings that parse but cannot work.
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidPrefix);
    }
    Ok(())
}
