// src/core/paths.rs

use crate::{
    constants::{BINARY_ENV_VAR, CONFIG_DIR_NAME, RESOURCES_DIR_NAME},
    models::BinaryConfig,
};
use lazy_static::lazy_static;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Failures while finding the config directory or the node executable.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no user config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// A directory could not be created.
    #[error("Could not create directory at '{path}': {source}")]
    DirCreation {
        /// The directory that was being created.
        path: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// A configured path referenced an unknown variable or home directory.
    #[error("Failed to expand path '{template}': {reason}")]
    Expansion {
        /// The path as written in the configuration.
        template: String,
        /// Why expansion failed.
        reason: String,
    },
}

/// Returns the path to the chain-bridge configuration directory (`~/.config/chain-bridge`).
/// Creates it if it doesn't exist.
///
/// The first call computes and caches the path; later calls return the cached value.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    // A poisoned lock still holds a valid path (or none); keep using it.
    let mut cached = CONFIG_DIR.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);
    ensure_dir(&config_path)?;

    *cached = Some(config_path.clone());
    Ok(config_path)
}

fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| PathError::DirCreation {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a configured path.
pub fn expand_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(dunce::simplified(Path::new(&*expanded)).to_path_buf())
}

/// Appends the platform's executable suffix (`.exe` on Windows) unless it is already there.
pub fn executable_file_name(stem: &str) -> String {
    let suffix = env::consts::EXE_SUFFIX;
    if suffix.is_empty() || stem.ends_with(suffix) {
        stem.to_string()
    } else {
        format!("{stem}{suffix}")
    }
}

/// Locates the node executable using the process environment and the user's config directory.
pub fn locate_binary(config: &BinaryConfig) -> Result<PathBuf, PathError> {
    let env_override = env::var(BINARY_ENV_VAR).ok();
    let config_dir = get_config_dir()?;
    resolve_binary_path(config, &config_dir, env_override.as_deref())
}

/// Decides which node executable the bridge talks to.
///
/// In order of priority:
/// 1. `env_override` (the `CHAIN_BRIDGE_BINARY` variable), used verbatim after expansion.
/// 2. `binary.path` from `bridge.toml`.
/// 3. `<config_dir>/resources/<binary.name>`. If that file is missing and
///    `binary.build_output` points at an existing file, it is copied there first.
///
/// The returned path is not required to exist. A missing executable surfaces
/// later as a failed operation, like any other spawn failure.
pub fn resolve_binary_path(
    config: &BinaryConfig,
    config_dir: &Path,
    env_override: Option<&str>,
) -> Result<PathBuf, PathError> {
    if let Some(raw) = env_override.filter(|v| !v.trim().is_empty()) {
        log::debug!("Using node executable from ${}: {}", BINARY_ENV_VAR, raw);
        return expand_path(raw);
    }

    if let Some(raw) = &config.path {
        log::debug!("Using node executable from config: {}", raw);
        return expand_path(raw);
    }

    let resources_dir = config_dir.join(RESOURCES_DIR_NAME);
    let target = resources_dir.join(executable_file_name(&config.name));
    if !target.exists() {
        if let Some(raw) = &config.build_output {
            let source = expand_path(raw)?;
            provision_binary(&source, &resources_dir, &target)?;
        }
    }

    if target.exists() {
        log::debug!("Node executable: {}", target.display());
    } else {
        log::warn!("Node executable not found at '{}'.", target.display());
    }
    Ok(target)
}

/// Copies a freshly built executable into the resources directory.
/// A failed copy is logged and otherwise ignored.
fn provision_binary(source: &Path, resources_dir: &Path, target: &Path) -> Result<(), PathError> {
    if !source.is_file() {
        log::debug!(
            "Build output '{}' does not exist; nothing to provision.",
            source.display()
        );
        return Ok(());
    }

    ensure_dir(resources_dir)?;
    match fs::copy(source, target) {
        Ok(_) => log::info!(
            "Copied node executable '{}' to '{}'.",
            source.display(),
            target.display()
        ),
        Err(e) => log::error!(
            "Failed to copy node executable '{}' to '{}': {}",
            source.display(),
            target.display(),
            e
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn binary_config() -> BinaryConfig {
        BinaryConfig::default()
    }

    #[test]
    fn test_env_override_wins_over_config_path() {
        let dir = TempDir::new().unwrap();
        let config = BinaryConfig {
            path: Some("/opt/from-config".to_string()),
            ..binary_config()
        };
        let resolved = resolve_binary_path(&config, dir.path(), Some("/opt/from-env")).unwrap();
        assert_eq!(resolved, PathBuf::from("/opt/from-env"));
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let dir = TempDir::new().unwrap();
        let config = BinaryConfig {
            path: Some("/opt/from-config".to_string()),
            ..binary_config()
        };
        let resolved = resolve_binary_path(&config, dir.path(), Some("  ")).unwrap();
        assert_eq!(resolved, PathBuf::from("/opt/from-config"));
    }

    #[test]
    fn test_defaults_to_resources_dir() {
        let dir = TempDir::new().unwrap();
        let resolved = resolve_binary_path(&binary_config(), dir.path(), None).unwrap();
        assert_eq!(
            resolved,
            dir.path()
                .join(RESOURCES_DIR_NAME)
                .join(executable_file_name("blockchain-demo"))
        );
        assert!(!resolved.exists());
    }

    #[test]
    fn test_build_output_is_copied_into_resources() {
        let dir = TempDir::new().unwrap();
        let build_output = dir.path().join("built-node");
        fs::write(&build_output, b"#!/bin/sh\n").unwrap();

        let config = BinaryConfig {
            build_output: Some(build_output.display().to_string()),
            ..binary_config()
        };
        let resolved = resolve_binary_path(&config, dir.path(), None).unwrap();
        assert!(resolved.starts_with(dir.path().join(RESOURCES_DIR_NAME)));
        assert_eq!(fs::read(&resolved).unwrap(), b"#!/bin/sh\n");
    }

    #[test]
    fn test_existing_resource_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let resources = dir.path().join(RESOURCES_DIR_NAME);
        fs::create_dir_all(&resources).unwrap();
        let existing = resources.join(executable_file_name("blockchain-demo"));
        fs::write(&existing, b"old").unwrap();
        let build_output = dir.path().join("built-node");
        fs::write(&build_output, b"new").unwrap();

        let config = BinaryConfig {
            build_output: Some(build_output.display().to_string()),
            ..binary_config()
        };
        let resolved = resolve_binary_path(&config, dir.path(), None).unwrap();
        assert_eq!(fs::read(resolved).unwrap(), b"old");
    }

    #[test]
    fn test_executable_file_name() {
        let name = executable_file_name("blockchain-demo");
        if cfg!(windows) {
            assert_eq!(name, "blockchain-demo.exe");
            assert_eq!(executable_file_name("node.exe"), "node.exe");
        } else {
            assert_eq!(name, "blockchain-demo");
        }
    }

    #[test]
    fn test_expand_path_rejects_unknown_variables() {
        let result = expand_path("$CHAIN_BRIDGE_SURELY_UNDEFINED_VAR/node");
        assert!(matches!(result, Err(PathError::Expansion { .. })));
    }
}
