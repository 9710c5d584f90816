//! Command dispatcher
//!
//! Resolves a developer command to its action and carries it out. The
//! exit code of a delegated tool is returned as-is; nothing here retries
//! or interprets results.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;

use crate::clean::clean;
use crate::command::{Action, CommandTable, DevCommand, Invocation};
use crate::error::{suggest_fix, suggest_install, DispatchError};
use crate::executor::{exec_invocation, ExecOptions, PathLocator, ProgramLocator};

/// Outcome of dispatching one command
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Exit code to hand back to the shell
    pub exit_code: i32,
    /// What was run, for display
    pub ran: String,
    /// Suggested fix derived from captured stderr, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Dispatches developer commands in one project directory
pub struct Dispatcher {
    table: CommandTable,
    project_dir: PathBuf,
    locator: Arc<dyn ProgramLocator>,
    dry_run: bool,
    capture_output: bool,
    spinner: bool,
    timeout_override: Option<u64>,
}

impl Dispatcher {
    /// Create a dispatcher that looks programs up on PATH
    pub fn new(table: CommandTable, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            table,
            project_dir: project_dir.into(),
            locator: Arc::new(PathLocator),
            dry_run: false,
            capture_output: false,
            spinner: false,
            timeout_override: None,
        }
    }

    /// Replace the program locator
    pub fn with_locator(mut self, locator: Arc<dyn ProgramLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Print what would run instead of running it
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Capture child output and print it after exit
    pub fn with_capture(mut self, capture: bool, spinner: bool) -> Self {
        self.capture_output = capture;
        self.spinner = spinner;
        self
    }

    /// Override every command's timeout; 0 disables timeouts
    pub fn with_timeout_override(mut self, secs: Option<u64>) -> Self {
        self.timeout_override = secs;
        self
    }

    /// Resolve a command with this dispatcher's overrides applied
    pub fn resolve(
        &self,
        command: DevCommand,
        extra_args: &[String],
    ) -> Result<Action, DispatchError> {
        let action = self.table.resolve(command, extra_args)?;
        Ok(match (action, self.timeout_override) {
            (Action::Exec(invocation), Some(secs)) => {
                Action::Exec(invocation.with_timeout_secs(secs))
            }
            (action, _) => action,
        })
    }

    /// Dispatch a command and return the exit code to propagate
    ///
    /// # Errors
    /// * `DispatchError::ProgramNotFound` - If the program is not on PATH
    /// * `DispatchError::SpawnFailed` - If the process could not be started
    /// * `DispatchError::Timeout` - If the process ran past its timeout
    /// * `DispatchError::InvalidPattern` - If a clean pattern is unsafe
    pub async fn dispatch(
        &self,
        command: DevCommand,
        extra_args: &[String],
    ) -> Result<Outcome, DispatchError> {
        let action = self.resolve(command, extra_args)?;
        let ran = action.display_line();

        if self.dry_run {
            println!("{}", ran);
            return Ok(Outcome {
                exit_code: 0,
                ran,
                suggestion: None,
            });
        }

        tracing::info!("{}: {}", command, ran);

        match action {
            Action::Exec(invocation) => self.run_invocation(&invocation).await,
            Action::Clean { patterns } => {
                let report = clean(&self.project_dir, &patterns)?;
                for path in &report.removed {
                    println!("{} {}", "removed".yellow(), path.display());
                }
                println!("{} {} path(s)", "Cleaned".green(), report.removed.len());
                Ok(Outcome {
                    exit_code: 0,
                    ran,
                    suggestion: None,
                })
            }
        }
    }

    async fn run_invocation(&self, invocation: &Invocation) -> Result<Outcome, DispatchError> {
        if self
            .locator
            .locate(&invocation.program, &self.project_dir)
            .is_none()
        {
            return Err(DispatchError::ProgramNotFound {
                program: invocation.program.clone(),
                suggestion: suggest_install(&invocation.program),
            });
        }

        let options = ExecOptions {
            working_dir: Some(self.project_dir.clone()),
            capture_output: self.capture_output,
            spinner: self.spinner,
            ..Default::default()
        };

        let result = exec_invocation(invocation, &options).await?;

        if self.capture_output {
            print!("{}", result.stdout);
            eprint!("{}", result.stderr);
        }

        let suggestion = if result.success() {
            None
        } else {
            suggest_fix(&invocation.command_line(), &result.stderr)
        };

        Ok(Outcome {
            exit_code: result.exit_code,
            ran: invocation.command_line(),
            suggestion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CommandConfig, Config};
    use crate::executor::MockProgramLocator;
    use crate::toolchain::PackageManager;
    use std::path::Path;
    use tempfile::TempDir;

    fn dispatcher_with(dir: &Path, overrides: &[(&str, &[&str])]) -> Dispatcher {
        let mut config = Config::default();
        for (name, argv) in overrides {
            config.commands.insert(
                name.to_string(),
                CommandConfig {
                    argv: argv.iter().map(|s| s.to_string()).collect(),
                    ..Default::default()
                },
            );
        }
        let table = CommandTable::new(config, PackageManager::Poetry, None);
        Dispatcher::new(table, dir).with_capture(true, false)
    }

    #[tokio::test]
    async fn test_exit_code_equals_tool_exit_code() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_with(dir.path(), &[("lint", &["sh", "-c", "exit 3"])]);

        let outcome = dispatcher.dispatch(DevCommand::Lint, &[]).await.unwrap();

        assert_eq!(outcome.exit_code, 3);
        assert_eq!(outcome.ran, "sh -c 'exit 3'");
    }

    #[tokio::test]
    async fn test_success_exit_code() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_with(dir.path(), &[("test", &["true"])]);

        let outcome = dispatcher.dispatch(DevCommand::Test, &[]).await.unwrap();
        assert_eq!(outcome.exit_code, 0);
        assert!(outcome.suggestion.is_none());
    }

    #[tokio::test]
    async fn test_release_args_reach_the_script() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("release.sh"),
            "[ \"$1\" = \"1.2.3-rc.1\" ] && exit 0; exit 9\n",
        )
        .unwrap();
        let dispatcher = dispatcher_with(dir.path(), &[("release", &["sh", "release.sh"])]);

        let ok = dispatcher
            .dispatch(DevCommand::Release, &["1.2.3-rc.1".to_string()])
            .await
            .unwrap();
        assert_eq!(ok.exit_code, 0);

        let rejected = dispatcher
            .dispatch(DevCommand::Release, &["bogus".to_string()])
            .await
            .unwrap();
        assert_eq!(rejected.exit_code, 9);
    }

    #[tokio::test]
    async fn test_failure_suggestion() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_with(
            dir.path(),
            &[("test", &["sh", "-c", "echo \"No module named 'httpx'\" >&2; exit 1"])],
        );

        let outcome = dispatcher.dispatch(DevCommand::Test, &[]).await.unwrap();

        assert_eq!(outcome.exit_code, 1);
        assert!(outcome.suggestion.unwrap().contains("devcmd install"));
    }

    #[tokio::test]
    async fn test_program_not_found_uses_locator() {
        let dir = TempDir::new().unwrap();
        let mut locator = MockProgramLocator::new();
        locator
            .expect_locate()
            .withf(|program, _| program == "poetry")
            .times(1)
            .returning(|_, _| None);

        let table = CommandTable::new(Config::default(), PackageManager::Poetry, None);
        let dispatcher = Dispatcher::new(table, dir.path()).with_locator(Arc::new(locator));

        match dispatcher.dispatch(DevCommand::Install, &[]).await {
            Err(DispatchError::ProgramNotFound { program, suggestion }) => {
                assert_eq!(program, "poetry");
                assert!(suggestion.unwrap().contains("pipx install poetry"));
            }
            other => panic!("Expected ProgramNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dry_run_never_consults_locator() {
        let dir = TempDir::new().unwrap();
        let mut locator = MockProgramLocator::new();
        locator.expect_locate().never();

        let table = CommandTable::new(Config::default(), PackageManager::Poetry, None);
        let dispatcher = Dispatcher::new(table, dir.path())
            .with_locator(Arc::new(locator))
            .with_dry_run(true);

        let outcome = dispatcher
            .dispatch(DevCommand::ReleaseMinor, &[])
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.ran, "poetry run python scripts/release.py minor");
    }

    #[tokio::test]
    async fn test_dry_run_clean_keeps_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();

        let table = CommandTable::new(Config::default(), PackageManager::Poetry, None);
        let dispatcher = Dispatcher::new(table, dir.path()).with_dry_run(true);

        dispatcher.dispatch(DevCommand::Clean, &[]).await.unwrap();
        assert!(dir.path().join("dist").exists());
    }

    #[tokio::test]
    async fn test_clean_dispatch() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();
        std::fs::create_dir(dir.path().join("htmlcov")).unwrap();

        let table = CommandTable::new(Config::default(), PackageManager::Poetry, None);
        let dispatcher = Dispatcher::new(table, dir.path());

        let outcome = dispatcher.dispatch(DevCommand::Clean, &[]).await.unwrap();

        assert_eq!(outcome.exit_code, 0);
        assert!(!dir.path().join("dist").exists());
        assert!(!dir.path().join("htmlcov").exists());
    }

    #[test]
    fn test_timeout_override() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.defaults.timeout = 30;
        let table = CommandTable::new(config, PackageManager::Poetry, None);

        let dispatcher = Dispatcher::new(table.clone(), dir.path()).with_timeout_override(Some(0));
        match dispatcher.resolve(DevCommand::Test, &[]).unwrap() {
            Action::Exec(inv) => assert!(inv.timeout.is_none()),
            other => panic!("Expected Exec, got {:?}", other),
        }

        let dispatcher = Dispatcher::new(table, dir.path());
        match dispatcher.resolve(DevCommand::Test, &[]).unwrap() {
            Action::Exec(inv) => assert_eq!(inv.timeout, Some(std::time::Duration::from_secs(30))),
            other => panic!("Expected Exec, got {:?}", other),
        }
    }
}
