//! Package manager auto-detection
//!
//! Detects which package manager a project uses by checking for:
//! - `poetry.lock` or a `[tool.poetry]` table (poetry)
//! - `uv.lock` (uv)
//! - `pyproject.toml`, `setup.py` or `requirements.txt` (pip)

use std::path::Path;

use serde::Serialize;

use super::manager::PackageManager;
use super::pyproject::{PyProject, PYPROJECT};
use crate::config::Config;

/// Manager used when nothing in the project points at one
pub const FALLBACK_MANAGER: PackageManager = PackageManager::Poetry;

/// Files found during detection
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilesFound {
    pub pyproject: bool,
    pub poetry_lock: bool,
    pub uv_lock: bool,
    pub setup_py: bool,
    pub requirements_txt: bool,
}

/// Result of package manager detection
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    /// The detected manager (first match by priority)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected: Option<PackageManager>,
    /// All managers whose marker files were found
    pub available: Vec<PackageManager>,
    /// Details about files found
    pub files_found: FilesFound,
    /// Import name of the package, from pyproject.toml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

/// Detect which package manager a project uses
///
/// Checks marker files in the order configured in
/// `config.defaults.manager_priority`.
pub fn detect_manager(dir: &Path, config: &Config) -> DetectionResult {
    let manifest = PyProject::load(dir);

    let mut result = DetectionResult {
        files_found: FilesFound {
            pyproject: dir.join(PYPROJECT).is_file(),
            poetry_lock: dir.join("poetry.lock").is_file(),
            uv_lock: dir.join("uv.lock").is_file(),
            setup_py: dir.join("setup.py").is_file(),
            requirements_txt: dir.join("requirements.txt").is_file(),
        },
        package: manifest.as_ref().and_then(PyProject::import_name),
        ..Default::default()
    };

    let has_poetry_table = manifest.as_ref().is_some_and(|m| m.has_poetry_table);

    for name in &config.defaults.manager_priority {
        let manager = match name.parse::<PackageManager>() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Ignoring manager_priority entry: {}", e);
                continue;
            }
        };

        let found = {
            let files = &result.files_found;
            match manager {
                PackageManager::Poetry => files.poetry_lock || has_poetry_table,
                PackageManager::Uv => files.uv_lock,
                PackageManager::Pip => {
                    files.pyproject || files.setup_py || files.requirements_txt
                }
            }
        };

        if found && !result.available.contains(&manager) {
            result.available.push(manager);
            if result.detected.is_none() {
                result.detected = Some(manager);
            }
        }
    }

    result
}

impl DetectionResult {
    /// Manager to use: configured, detected, or the fallback
    pub fn resolve(&self, config: &Config) -> PackageManager {
        if let Some(forced) = config.forced_manager() {
            return forced;
        }

        self.detected.unwrap_or_else(|| {
            tracing::debug!("No package manager detected, using {}", FALLBACK_MANAGER);
            FALLBACK_MANAGER
        })
    }
}
