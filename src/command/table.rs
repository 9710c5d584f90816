//! Static command table
//!
//! Maps each [`DevCommand`] to the action it performs for a given package
//! manager, honouring per-command overrides from configuration.

use serde::Serialize;

use super::invocation::{Action, Invocation};
use super::name::DevCommand;
use crate::config::Config;
use crate::error::DispatchError;
use crate::toolchain::PackageManager;

/// One row of the command listing
#[derive(Debug, Clone, Serialize)]
pub struct CommandListing {
    pub name: &'static str,
    pub description: String,
    /// What the command runs, or the reason it could not be resolved
    pub runs: String,
}

/// Resolves command names to actions
#[derive(Debug, Clone)]
pub struct CommandTable {
    config: Config,
    manager: PackageManager,
    package: Option<String>,
}

impl CommandTable {
    /// Create a table for a resolved package manager
    ///
    /// `detected_package` is used as the coverage target unless
    /// `project.package` is configured.
    pub fn new(config: Config, manager: PackageManager, detected_package: Option<String>) -> Self {
        let package = config.project.package.clone().or(detected_package);
        Self {
            config,
            manager,
            package,
        }
    }

    /// Resolve a command and its trailing arguments to an action
    ///
    /// `extra_args` are appended verbatim to the invocation. For the release
    /// commands this is how a bump keyword or version string reaches the
    /// release script; nothing here validates it. `clean` takes no arguments
    /// and ignores them.
    pub fn resolve(
        &self,
        command: DevCommand,
        extra_args: &[String],
    ) -> Result<Action, DispatchError> {
        if command == DevCommand::Clean {
            if !extra_args.is_empty() {
                tracing::warn!("clean ignores arguments: {}", extra_args.join(" "));
            }
            return Ok(Action::Clean {
                patterns: self.config.clean.patterns.clone(),
            });
        }

        let overrides = self.config.command(command);

        let argv = match overrides {
            Some(o) if !o.argv.is_empty() => o.argv.clone(),
            _ => self.default_argv(command),
        };

        let timeout = overrides
            .and_then(|o| o.timeout)
            .unwrap_or(self.config.defaults.timeout);

        let mut invocation = Invocation::from_argv(argv)?
            .with_args(extra_args.iter().cloned())
            .with_timeout_secs(timeout);

        if let Some(o) = overrides {
            invocation = invocation.with_env(&o.env);
        }

        tracing::debug!("Resolved {} to: {}", command, invocation);
        Ok(Action::Exec(invocation))
    }

    /// Built-in argument vector for a command
    fn default_argv(&self, command: DevCommand) -> Vec<String> {
        let manager = self.manager;
        let python = self.config.project.python.as_str();
        let release_script = self.config.project.release_script.as_str();

        match command {
            DevCommand::Install => manager.install_argv(python),
            DevCommand::Build => manager.build_argv(python),
            DevCommand::Test => manager.run(&["pytest"]),
            DevCommand::TestCov => {
                let cov = match &self.package {
                    Some(package) => format!("--cov={}", package),
                    None => "--cov".to_string(),
                };
                manager.run(&[
                    "pytest",
                    cov.as_str(),
                    "--cov-report=term-missing",
                    "--cov-report=html",
                ])
            }
            DevCommand::Lint => manager.run(&["ruff", "check", "."]),
            DevCommand::Format => manager.run(&["ruff", "format", "."]),
            DevCommand::Typecheck => manager.run(&["mypy", "."]),
            DevCommand::ReleasePatch | DevCommand::ReleaseMinor | DevCommand::ReleaseMajor => {
                let mut argv = manager.run(&[python, release_script]);
                argv.extend(command.bump().map(|b| b.keyword().to_string()));
                argv
            }
            DevCommand::Release => manager.run(&[python, release_script]),
            // Never reached: clean resolves to Action::Clean
            DevCommand::Clean => vec![],
        }
    }

    /// The help listing: every command with its description and action
    pub fn describe(&self) -> Vec<CommandListing> {
        DevCommand::ALL
            .iter()
            .map(|&command| {
                let description = self
                    .config
                    .command(command)
                    .and_then(|o| o.description.clone())
                    .unwrap_or_else(|| command.description().to_string());

                let mut runs = match self.resolve(command, &[]) {
                    Ok(action) => action.display_line(),
                    Err(e) => format!("<{}>", e),
                };
                if command == DevCommand::Release {
                    runs.push_str(" <patch|minor|major|x.y.z>");
                }

                CommandListing {
                    name: command.name(),
                    description,
                    runs,
                }
            })
            .collect()
    }
}
