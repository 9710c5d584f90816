//! Error types for devcmd
//!
//! Failures of the delegated tools are not errors here: their exit codes are
//! passed through untouched. These variants cover what goes wrong before or
//! around the child process.

use thiserror::Error;

/// Main error type for dispatch operations
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Command name is not one of the known developer commands
    #[error("Unknown command '{name}'")]
    UnknownCommand { name: String, available: Vec<String> },

    /// Program could not be located on PATH
    #[error("Program not found: {program}")]
    ProgramNotFound {
        program: String,
        suggestion: Option<String>,
    },

    /// Failed to spawn the command
    #[error("Failed to spawn command: {command}")]
    SpawnFailed { command: String, error: String },

    /// Command timed out
    #[error("Command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A clean pattern could not be used
    #[error("Invalid clean pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// Exit code reported to the shell for this error
    ///
    /// Follows shell conventions where one exists (127 not found, 126 not
    /// executable, 124 timeout) and sysexits.h otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::UnknownCommand { .. } => 64,
            DispatchError::ProgramNotFound { .. } => 127,
            DispatchError::SpawnFailed { .. } => 126,
            DispatchError::Timeout { .. } => 124,
            DispatchError::Config(_) => 78,
            DispatchError::InvalidPattern { .. } => 65,
            DispatchError::Io(_) => 74,
        }
    }

    /// Hint to print after the error message, if any
    pub fn hint(&self) -> Option<String> {
        match self {
            DispatchError::UnknownCommand { available, .. } => {
                Some(format!("Available commands: {}", available.join(", ")))
            }
            DispatchError::ProgramNotFound { suggestion, .. } => suggestion.clone(),
            DispatchError::SpawnFailed { error, .. } => {
                Some(format!("Check that the program is executable: {}", error))
            }
            DispatchError::Timeout { .. } => Some(
                "Increase the timeout with --timeout or [defaults].timeout".to_string(),
            ),
            DispatchError::Config(_) => {
                Some("Check your devcmd configuration file".to_string())
            }
            DispatchError::InvalidPattern { .. } => {
                Some("Clean patterns must stay inside the project directory".to_string())
            }
            DispatchError::Io(_) => None,
        }
    }
}

/// Suggest an install command for a program missing from PATH
pub fn suggest_install(program: &str) -> Option<String> {
    let hint = match program {
        "poetry" => "Install poetry: pipx install poetry",
        "uv" => "Install uv: curl -LsSf https://astral.sh/uv/install.sh | sh",
        "python" | "python3" => "Install Python 3 or activate your virtual environment",
        "pytest" | "ruff" | "mypy" => {
            return Some(format!(
                "'{}' is not on PATH. Activate the project environment or run 'devcmd install'",
                program
            ))
        }
        _ => return None,
    };
    Some(hint.to_string())
}

/// Suggest fixes for common failure output of the delegated tools
pub fn suggest_fix(command: &str, stderr: &str) -> Option<String> {
    if stderr.contains("No module named") {
        return Some(
            "A Python module is missing. Run 'devcmd install' to install dependencies.".to_string(),
        );
    }

    if stderr.contains("pyproject.toml changed significantly")
        || stderr.contains("poetry.lock is not consistent")
    {
        return Some("The lock file is stale. Run 'poetry lock' and retry.".to_string());
    }

    if stderr.contains("Permission denied") {
        return Some(
            "Permission denied. Check file permissions or run with appropriate access.".to_string(),
        );
    }

    if stderr.contains("command not found") || stderr.contains("not found") {
        if command.contains("poetry") {
            return suggest_install("poetry");
        }
        if command.contains("uv ") {
            return suggest_install("uv");
        }
        return Some("Required command not found. Check PATH and dependencies.".to_string());
    }

    if stderr.contains("No such file") && command.contains("release") {
        return Some(
            "Release script not found. Check [project].release_script in your config.".to_string(),
        );
    }

    if stderr.contains("uncommitted changes") {
        return Some("Commit or stash your changes before releasing.".to_string());
    }

    None
}
