//! Locates and reads the optional TOML configuration file and the environment fallback key.

use super::file::ConfigFile;
use crate::core::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted once at startup for the fallback API key.
pub const API_KEY_ENV_VAR: &str = "BOUNCEBAN_API_KEY";

const LOCAL_CONFIG_NAME: &str = "bounceban-bridge.toml";

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_NAME)];
    if let Ok(home) = std::env::var("HOME") {
        candidates.push(
            PathBuf::from(home)
                .join(".config")
                .join("bounceban-bridge")
                .join("config.toml"),
        );
    }
    candidates
}

/// Loads the configuration file.
///
/// An explicit path must exist. Without one, the default locations are tried in order
/// and a missing file simply yields `None`.
pub fn load_config_file(explicit: Option<&Path>) -> Result<Option<(ConfigFile, PathBuf)>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(AppError::Config(format!(
                "Config file '{}' not found",
                path.display()
            )));
        }
        return read_config_file(path).map(|file| Some((file, path.to_path_buf())));
    }

    for candidate in default_candidates() {
        if candidate.is_file() {
            tracing::debug!(target: "config", "Found config file at {}", candidate.display());
            return read_config_file(&candidate).map(|file| Some((file, candidate)));
        }
    }

    tracing::debug!(target: "config", "No config file found, using defaults");
    Ok(None)
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        AppError::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Reads the fallback API key from the process environment. Blank values count as absent.
pub(crate) fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV_VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
