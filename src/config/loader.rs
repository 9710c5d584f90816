//! Configuration loader with XDG-compliant path resolution
//!
//! Loads configuration from multiple locations with layered priority:
//! 1. `/etc/devcmd/config.toml` (lowest priority)
//! 2. `~/.config/devcmd/config.toml`
//! 3. `~/.devcmd.toml`
//! 4. `<project>/.devcmd.toml` (highest priority)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use super::interpolate::interpolate_config;
use super::model::Config;
use crate::error::DispatchError;

/// Application name used for XDG directories
const APP_NAME: &str = "devcmd";

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "DEVCMD_";

/// Get config search paths in priority order (lowest to highest)
pub fn config_paths(project_dir: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from(format!("/etc/{}/config.toml", APP_NAME)));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}.toml", APP_NAME)));
    }

    paths.push(project_dir.join(format!(".{}.toml", APP_NAME)));

    paths
}

/// Load configuration with layering
///
/// Configurations are merged in priority order, with later files
/// overriding earlier ones. An explicit `override_path` sits above all
/// files, and environment variables with prefix `DEVCMD_` override
/// everything. The result is validated and interpolated.
pub fn load_config(project_dir: &Path, override_path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    for path in config_paths(project_dir) {
        if path.is_file() {
            tracing::debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }
    }

    if let Some(path) = override_path {
        if path.is_file() {
            tracing::debug!("Loading override config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        } else {
            tracing::warn!("Override config not found: {}", path.display());
        }
    }

    // DEVCMD_DEFAULTS__TIMEOUT=600 maps to defaults.timeout = 600
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let mut config: Config = figment
        .extract()
        .map_err(|e| DispatchError::Config(e.to_string()))
        .context("Failed to load configuration")?;
    config.validate()?;
    interpolate_config(&mut config);

    Ok(config)
}

/// Find all existing config files (for `detect` output)
pub fn find_config_files(project_dir: &Path) -> Vec<PathBuf> {
    config_paths(project_dir)
        .into_iter()
        .filter(|p| p.is_file())
        .collect()
}
