//! CLI command definitions using clap
//!
//! Defines all CLI subcommands and their arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::command::DevCommand;

/// Developer command dispatcher for Python package repositories.
///
/// Runs tests, linters, formatters, builds and releases through the
/// project's package manager. Run without a command to list them all.
///
/// Options go before the command; everything after it is passed to the
/// tool unchanged (`devcmd -n test -v -n 4`).
#[derive(Parser, Debug)]
#[command(name = "devcmd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long, env = "DEVCMD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long)]
    pub project: Option<PathBuf>,

    /// Print the command that would run without running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Capture output and print it when the command finishes
    #[arg(long)]
    pub capture: bool,

    /// Timeout in seconds for the delegated command (0 for no timeout)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install dependencies
    #[command(disable_help_flag = true)]
    Install(PassArgs),

    /// Run tests
    #[command(disable_help_flag = true)]
    Test(PassArgs),

    /// Run tests with coverage
    #[command(disable_help_flag = true)]
    TestCov(PassArgs),

    /// Run linting
    #[command(disable_help_flag = true)]
    Lint(PassArgs),

    /// Format code (set [commands.format].argv to also apply lint autofixes)
    #[command(disable_help_flag = true)]
    Format(PassArgs),

    /// Run type checking
    #[command(disable_help_flag = true)]
    Typecheck(PassArgs),

    /// Build package
    #[command(disable_help_flag = true)]
    Build(PassArgs),

    /// Clean build artifacts and caches
    Clean,

    /// Release patch version (x.y.Z)
    ReleasePatch,

    /// Release minor version (x.Y.0)
    ReleaseMinor,

    /// Release major version (X.0.0)
    ReleaseMajor,

    /// Release with a bump keyword (patch, minor, major) or an explicit version
    #[command(disable_help_flag = true)]
    Release(PassArgs),

    /// List available commands and what they run
    List(ListArgs),

    /// Detect the project's package manager
    Detect(DetectArgs),
}

impl Commands {
    /// The developer command and its forwarded arguments, if this is one
    pub fn dev_command(&self) -> Option<(DevCommand, &[String])> {
        let (command, args): (DevCommand, &[String]) = match self {
            Commands::Install(a) => (DevCommand::Install, &a.args),
            Commands::Test(a) => (DevCommand::Test, &a.args),
            Commands::TestCov(a) => (DevCommand::TestCov, &a.args),
            Commands::Lint(a) => (DevCommand::Lint, &a.args),
            Commands::Format(a) => (DevCommand::Format, &a.args),
            Commands::Typecheck(a) => (DevCommand::Typecheck, &a.args),
            Commands::Build(a) => (DevCommand::Build, &a.args),
            Commands::Clean => (DevCommand::Clean, &[]),
            Commands::ReleasePatch => (DevCommand::ReleasePatch, &[]),
            Commands::ReleaseMinor => (DevCommand::ReleaseMinor, &[]),
            Commands::ReleaseMajor => (DevCommand::ReleaseMajor, &[]),
            Commands::Release(a) => (DevCommand::Release, &a.args),
            Commands::List(_) | Commands::Detect(_) => return None,
        };
        Some((command, args))
    }
}

/// Arguments forwarded verbatim to the delegated tool
#[derive(Args, Debug, Default)]
pub struct PassArgs {
    /// Extra arguments appended to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `list` subcommand
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the `detect` subcommand
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON output
    Json,
    /// Plain text (one name per line)
    Plain,
}
