//! External invocations and dispatch actions

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::DispatchError;

/// A single external process to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments, passed through without shell interpretation
    pub args: Vec<String>,
    /// Extra environment variables
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    /// Timeout for the process (None = no timeout)
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            env: HashMap::new(),
            timeout: None,
        }
    }

    /// Build an invocation from a full argument vector
    ///
    /// # Errors
    /// * `DispatchError::Config` - If `argv` is empty
    pub fn from_argv(argv: Vec<String>) -> Result<Self, DispatchError> {
        let mut iter = argv.into_iter();
        let program = iter
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DispatchError::Config("command argv must not be empty".to_string()))?;

        Ok(Self {
            args: iter.collect(),
            ..Self::new(program)
        })
    }

    /// Append arguments verbatim
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add environment variables
    pub fn with_env(mut self, env: &HashMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set the timeout; zero seconds means no timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Shell-like rendering for display and logging
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| quote_arg(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Quote an argument for display if the shell would split or expand it
fn quote_arg(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// What dispatching a command does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Run one external process
    Exec(Invocation),
    /// Remove files matching these glob patterns
    Clean { patterns: Vec<String> },
}

impl Action {
    /// Shell-like rendering for display
    pub fn display_line(&self) -> String {
        match self {
            Action::Exec(invocation) => invocation.command_line(),
            Action::Clean { patterns } => format!("remove {}", patterns.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv() {
        let inv = Invocation::from_argv(vec![
            "poetry".to_string(),
            "run".to_string(),
            "pytest".to_string(),
        ])
        .unwrap();

        assert_eq!(inv.program, "poetry");
        assert_eq!(inv.args, vec!["run", "pytest"]);
        assert!(inv.timeout.is_none());
    }

    #[test]
    fn test_from_empty_argv() {
        assert!(matches!(
            Invocation::from_argv(vec![]),
            Err(DispatchError::Config(_))
        ));
        assert!(Invocation::from_argv(vec![String::new()]).is_err());
    }

    #[test]
    fn test_builder() {
        let env: HashMap<String, String> =
            [("PYTHONWARNINGS".to_string(), "error".to_string())].into_iter().collect();

        let inv = Invocation::new("pytest")
            .with_args(["-k", "auth"])
            .with_env(&env)
            .with_timeout_secs(60);

        assert_eq!(inv.args, vec!["-k", "auth"]);
        assert_eq!(inv.env.get("PYTHONWARNINGS"), Some(&"error".to_string()));
        assert_eq!(inv.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let inv = Invocation::new("pytest").with_timeout_secs(0);
        assert!(inv.timeout.is_none());
    }

    #[test]
    fn test_command_line_quoting() {
        let inv = Invocation::new("poetry").with_args([
            "run",
            "pytest",
            "-k",
            "auth and not slow",
            "--cov-report=term-missing",
            "it's",
        ]);

        assert_eq!(
            inv.command_line(),
            r#"poetry run pytest -k 'auth and not slow' --cov-report=term-missing 'it'\''s'"#
        );
    }

    #[test]
    fn test_command_line_empty_arg() {
        let inv = Invocation::new("echo").with_args([""]);
        assert_eq!(inv.command_line(), "echo ''");
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::Exec(Invocation::new("poetry").with_args(["build"]));
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"kind\":\"exec\""));
        assert!(json.contains("\"program\":\"poetry\""));
        assert!(!json.contains("\"env\""));

        let clean = Action::Clean {
            patterns: vec!["dist".to_string()],
        };
        assert_eq!(clean.display_line(), "remove dist");
    }
}
