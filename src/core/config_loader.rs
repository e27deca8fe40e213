//! # Config Loader
//!
//! Loads `bridge.toml` from the chain-bridge config directory, writing a file
//! with the default settings the first time so users have something to edit.

use crate::{constants::CONFIG_FILENAME, core::paths, models::BridgeConfig};
use std::{fs, path::Path};
use thiserror::Error;

/// Failures while loading or creating `bridge.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config directory could not be found or created.
    #[error(transparent)]
    Path(#[from] paths::PathError),
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`BridgeConfig`].
    #[error("Failed to parse bridge.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// The default settings could not be written out.
    #[error("Failed to serialize config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Loads the bridge configuration from the user's config directory.
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    let config_dir = paths::get_config_dir()?;
    load_config_from(&config_dir)
}

/// Loads `bridge.toml` from `config_dir`, creating it with defaults if it is missing.
pub fn load_config_from(config_dir: &Path) -> Result<BridgeConfig, ConfigError> {
    let config_path = config_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_config = BridgeConfig::default();
        let toml_string = toml::to_string_pretty(&default_config)?;
        fs::write(&config_path, toml_string)?;
        log::debug!("Wrote default config to '{}'", config_path.display());
        return Ok(default_config);
    }

    let content = fs::read_to_string(&config_path)?;
    let config = toml::from_str(&content)?;
    log::debug!("Loaded config from '{}'", config_path.display());
    Ok(config)
}
