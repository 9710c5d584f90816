//! Python package managers and the invocations they provide

use std::str::FromStr;

use serde::Serialize;

/// Package manager that owns the project environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// Poetry (`poetry.lock`, `[tool.poetry]`)
    Poetry,
    /// uv (`uv.lock`)
    Uv,
    /// Plain pip inside an activated environment
    Pip,
}

impl PackageManager {
    /// Get the display name for this manager
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Poetry => "poetry",
            PackageManager::Uv => "uv",
            PackageManager::Pip => "pip",
        }
    }

    /// Prefix that runs a tool inside the project environment
    ///
    /// Empty for pip, which expects the environment to be active.
    pub fn run_prefix(&self) -> Vec<String> {
        match self {
            PackageManager::Poetry => vec!["poetry".to_string(), "run".to_string()],
            PackageManager::Uv => vec!["uv".to_string(), "run".to_string()],
            PackageManager::Pip => vec![],
        }
    }

    /// Argument vector that installs the project's dependencies
    pub fn install_argv(&self, python: &str) -> Vec<String> {
        match self {
            PackageManager::Poetry => vec!["poetry".to_string(), "install".to_string()],
            PackageManager::Uv => vec!["uv".to_string(), "sync".to_string()],
            PackageManager::Pip => [python, "-m", "pip", "install", "-e", "."]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Argument vector that builds sdist and wheel
    pub fn build_argv(&self, python: &str) -> Vec<String> {
        match self {
            PackageManager::Poetry => vec!["poetry".to_string(), "build".to_string()],
            PackageManager::Uv => vec!["uv".to_string(), "build".to_string()],
            PackageManager::Pip => vec![python.to_string(), "-m".to_string(), "build".to_string()],
        }
    }

    /// Prefix `tool_argv` with the run prefix
    pub fn run(&self, tool_argv: &[&str]) -> Vec<String> {
        let mut argv = self.run_prefix();
        argv.extend(tool_argv.iter().map(|s| s.to_string()));
        argv
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poetry" => Ok(PackageManager::Poetry),
            "uv" => Ok(PackageManager::Uv),
            "pip" => Ok(PackageManager::Pip),
            other => Err(format!(
                "unknown package manager '{}'; expected poetry, uv or pip",
                other
            )),
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
