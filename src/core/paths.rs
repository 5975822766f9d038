// src/core/paths.rs

use crate::{
    constants::{APP_DIR, CONFIG_FILENAME, INVENTORY_FILENAME},
    models::{ResolvedPaths, Settings},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while locating the binary's files.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// `~` or `$VAR` expansion failed.
    #[error("Failed to expand path '{path}': {message}")]
    Expansion {
        /// The path as configured.
        path: String,
        /// Why expansion failed.
        message: String,
    },
}

/// Returns the path to the chatroute configuration directory (`~/.config/chatroute`).
///
/// Unlike a project cache dir this is never created here; a missing directory
/// just means every file falls back to its defaults.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Returns the path of the default `config.toml`.
pub fn get_default_config_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Expands the home directory (`~`) and environment variables (`$VAR`) in a path.
pub fn expand_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        path: template.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Works out which inventory file to use for the given settings.
///
/// A configured `inventory` path wins; relative paths are taken relative to the
/// directory of the config file. Otherwise `inventory.toml` next to it is used.
pub fn resolve_paths(config_file: &Path, settings: &Settings) -> Result<ResolvedPaths, PathError> {
    let base_dir = config_file.parent().unwrap_or_else(|| Path::new("."));

    let inventory_file = match &settings.inventory {
        Some(template) => {
            let expanded = expand_path(template)?;
            if expanded.is_absolute() {
                expanded
            } else {
                base_dir.join(expanded)
            }
        }
        None => base_dir.join(INVENTORY_FILENAME),
    };

    Ok(ResolvedPaths {
        config_file: config_file.to_path_buf(),
        inventory_file,
    })
}
