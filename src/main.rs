//! devcmd CLI entry point
//!
//! Usage:
//!   devcmd                     List commands and what they run
//!   devcmd test [ARGS]...      Run tests through the package manager
//!   devcmd release <BUMP>      Run the release script
//!   devcmd detect              Detect the package manager

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use devcmd::cli::{print_detection, print_listing, Cli, Commands, OutputFormat};
use devcmd::command::CommandTable;
use devcmd::config::{find_config_files, load_config};
use devcmd::dispatch::Dispatcher;
use devcmd::error::DispatchError;
use devcmd::logging::init_logger;
use devcmd::toolchain::detect_manager;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli).await {
        Ok(code) => to_exit_code(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            match e.downcast_ref::<DispatchError>() {
                Some(err) => {
                    if let Some(hint) = err.hint() {
                        eprintln!("{}: {}", "hint".yellow(), hint);
                    }
                    to_exit_code(err.exit_code())
                }
                None => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let project_dir = resolve_project_dir(cli.project)?;
    let config = load_config(&project_dir, cli.config.as_deref())?;

    let detection = detect_manager(&project_dir, &config);
    let manager = detection.resolve(&config);
    tracing::debug!("Using {} in {}", manager, project_dir.display());

    let table = CommandTable::new(config, manager, detection.package.clone());

    let Some(command) = cli.command else {
        print_listing(&table.describe(), manager, OutputFormat::Table)?;
        return Ok(0);
    };

    match &command {
        Commands::List(args) => {
            print_listing(&table.describe(), manager, args.format)?;
            return Ok(0);
        }
        Commands::Detect(args) => {
            print_detection(
                &project_dir,
                &detection,
                manager,
                &find_config_files(&project_dir),
                args.format,
            )?;
            return Ok(0);
        }
        _ => {}
    }

    let Some((dev_command, extra_args)) = command.dev_command() else {
        return Ok(0);
    };

    let dispatcher = Dispatcher::new(table, project_dir)
        .with_dry_run(cli.dry_run)
        .with_capture(cli.capture, std::io::stderr().is_terminal())
        .with_timeout_override(cli.timeout);

    let outcome = dispatcher.dispatch(dev_command, extra_args).await?;

    if outcome.exit_code != 0 {
        if cli.verbose {
            eprintln!(
                "{}: {} exited with {}",
                "failed".red(),
                outcome.ran,
                outcome.exit_code
            );
        }
        if let Some(ref suggestion) = outcome.suggestion {
            eprintln!("{}: {}", "hint".yellow(), suggestion);
        }
    }

    Ok(outcome.exit_code)
}

/// Resolve the project directory from `-C` or the current directory
fn resolve_project_dir(project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
        Some(path) => {
            if !path.is_dir() {
                anyhow::bail!("Project directory '{}' not found", path.display());
            }
            Ok(path)
        }
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// Exit codes outside 0..=255 cannot be reported; map them to a generic failure
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

fn to_exit_code(code: i32) -> ExitCode {
    ExitCode::from(exit_status(code))
}
