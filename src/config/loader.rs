// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::{DevloopError, Result};

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolve the config for a run.
///
/// - An explicit path must exist.
/// - Without one, `Devloop.toml` is used if present; otherwise the built-in
///   defaults apply.
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(DevloopError::ConfigError(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            load_and_validate(path)
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                load_and_validate(&path)
            } else {
                info!("no {:?} found; using built-in defaults", path);
                let config = ConfigFile::default();
                validate_config(&config)?;
                Ok(config)
            }
        }
    }
}

/// Default config location: `Devloop.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Devloop.toml")
}
