//! Configuration value interpolation
//!
//! Supports environment variable, shell command and home directory
//! interpolation in config values:
//! - `$VAR` or `${VAR}` - Environment variable substitution
//! - `$(command)` - Shell command execution
//! - leading `~` - Home directory
//!
//! # Security Note
//!
//! Shell command execution runs with the current user's permissions.
//! A project-local `.devcmd.toml` can therefore run commands when any
//! devcmd command is invoked in that project.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::process::Command;

use super::model::Config;

/// `$(command)`
static COMMAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\(([^)]+)\)").unwrap());

/// `${VAR}`
static BRACKETED_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// `$VAR`, name must not start with a digit
static SIMPLE_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Interpolate a string with shell commands, environment variables and `~`
///
/// # Examples
///
/// ```
/// use devcmd::config::interpolate::interpolate_string;
///
/// std::env::set_var("DOC_EXAMPLE_VAR", "hello");
/// let result = interpolate_string("Value: $DOC_EXAMPLE_VAR");
/// assert_eq!(result, "Value: hello");
/// std::env::remove_var("DOC_EXAMPLE_VAR");
/// ```
pub fn interpolate_string(s: &str) -> String {
    // Commands first so their output is not re-read as variables
    let result = interpolate_commands(s);
    let result = interpolate_env_vars(&result);
    shellexpand::tilde(&result).into_owned()
}

fn interpolate_commands(s: &str) -> String {
    COMMAND_RE
        .replace_all(s, |caps: &Captures| {
            let cmd = &caps[1];
            match execute_shell_command(cmd) {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!("Failed to execute config command '{}': {}", cmd, e);
                    format!("$({})_ERROR", cmd)
                }
            }
        })
        .into_owned()
}

fn interpolate_env_vars(s: &str) -> String {
    let lookup = |caps: &Captures| {
        let var = &caps[1];
        std::env::var(var).unwrap_or_else(|_| {
            tracing::debug!("Environment variable '{}' not set", var);
            String::new()
        })
    };

    let result = BRACKETED_VAR_RE.replace_all(s, lookup);
    SIMPLE_VAR_RE.replace_all(&result, lookup).into_owned()
}

/// Execute a shell command and return its trimmed stdout
fn execute_shell_command(cmd: &str) -> Result<String, std::io::Error> {
    let output = Command::new("sh").arg("-c").arg(cmd).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(std::io::Error::other(format!("Command failed: {}", stderr)))
    }
}

/// Interpolate the string values of a Config that hold paths, arguments
/// or environment values
pub fn interpolate_config(config: &mut Config) {
    config.project.release_script = interpolate_string(&config.project.release_script);
    config.project.python = interpolate_string(&config.project.python);

    for command in config.commands.values_mut() {
        for arg in &mut command.argv {
            *arg = interpolate_string(arg);
        }
        for value in command.env.values_mut() {
            *value = interpolate_string(value);
        }
    }
}
