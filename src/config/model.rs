//! Configuration model for devcmd
//!
//! Defines the structure for layered configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::command::DevCommand;
use crate::error::DispatchError;
use crate::toolchain::PackageManager;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Project-level settings
    #[serde(default)]
    pub project: ProjectConfig,

    /// Default settings applied to every command
    #[serde(default)]
    pub defaults: Defaults,

    /// Artifact cleanup settings
    #[serde(default)]
    pub clean: CleanConfig,

    /// Per-command overrides, keyed by command name
    #[serde(default)]
    pub commands: HashMap<String, CommandConfig>,
}

/// Project-level settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Package manager: auto, poetry, uv or pip
    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    /// Import name of the package, used as the coverage target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Path of the release script, relative to the project directory
    #[serde(default = "default_release_script")]
    pub release_script: String,

    /// Python interpreter used to run the release script
    #[serde(default = "default_python")]
    pub python: String,
}

fn default_package_manager() -> String {
    "auto".to_string()
}

fn default_release_script() -> String {
    "scripts/release.py".to_string()
}

fn default_python() -> String {
    "python".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
            package: None,
            release_script: default_release_script(),
            python: default_python(),
        }
    }
}

/// Default settings applied to every command
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Package manager detection priority (first found wins)
    #[serde(default = "default_manager_priority")]
    pub manager_priority: Vec<String>,

    /// Default timeout in seconds (0 = no timeout)
    #[serde(default)]
    pub timeout: u64,
}

fn default_manager_priority() -> Vec<String> {
    vec!["poetry".to_string(), "uv".to_string(), "pip".to_string()]
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            manager_priority: default_manager_priority(),
            timeout: 0,
        }
    }
}

/// Artifact cleanup settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanConfig {
    /// Glob patterns, relative to the project directory
    #[serde(default = "default_clean_patterns")]
    pub patterns: Vec<String>,
}

fn default_clean_patterns() -> Vec<String> {
    [
        "build",
        "dist",
        "*.egg-info",
        ".pytest_cache",
        ".mypy_cache",
        ".ruff_cache",
        "htmlcov",
        ".coverage",
        "coverage.xml",
        "**/__pycache__",
        "**/*.pyc",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            patterns: default_clean_patterns(),
        }
    }
}

/// Override for a single command
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CommandConfig {
    /// Full argument vector; replaces the built-in invocation when set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub argv: Vec<String>,

    /// Extra environment variables for the child process
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Timeout override in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Description shown in the command listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Config {
    /// Check the parts of the configuration serde cannot
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.project.package_manager != "auto" {
            self.project
                .package_manager
                .parse::<PackageManager>()
                .map_err(DispatchError::Config)?;
        }

        for name in &self.defaults.manager_priority {
            name.parse::<PackageManager>()
                .map_err(|e| DispatchError::Config(format!("defaults.manager_priority: {}", e)))?;
        }

        for (name, command) in &self.commands {
            let parsed = name.parse::<DevCommand>().map_err(|_| {
                DispatchError::Config(format!(
                    "unknown command '{}' in [commands]; expected one of: {}",
                    name,
                    DevCommand::names().join(", ")
                ))
            })?;
            if parsed == DevCommand::Clean && !command.argv.is_empty() {
                return Err(DispatchError::Config(
                    "[commands.clean] cannot set argv; use [clean].patterns".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Override configured for a command, if any
    pub fn command(&self, command: DevCommand) -> Option<&CommandConfig> {
        self.commands.get(command.name())
    }

    /// Package manager forced by configuration, if not `auto`
    pub fn forced_manager(&self) -> Option<PackageManager> {
        self.project.package_manager.parse().ok()
    }
}
