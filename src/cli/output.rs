//! Rendering of the command listing and detection report

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use super::commands::OutputFormat;
use crate::command::CommandListing;
use crate::toolchain::{DetectionResult, PackageManager};

/// Print the command listing (the default when no command is given)
pub fn print_listing(
    listing: &[CommandListing],
    manager: PackageManager,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "package_manager": manager,
                "commands": listing,
            }))?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            for entry in listing {
                println!("{}", entry.name);
            }
        }
        OutputFormat::Table => {
            println!("{}: {}", "Package manager".cyan(), manager);
            println!();
            println!("{}:", "Available commands".cyan());

            let width = listing.iter().map(|e| e.name.len()).max().unwrap_or(10);
            for entry in listing {
                println!(
                    "  {}  {}",
                    format!("{:width$}", entry.name, width = width).green(),
                    entry.description
                );
                println!("  {:width$}  {}", "", entry.runs.dimmed(), width = width);
            }
        }
    }

    Ok(())
}

/// Print the package manager detection report
pub fn print_detection(
    project_dir: &Path,
    detection: &DetectionResult,
    resolved: PackageManager,
    config_files: &[PathBuf],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "project": project_dir,
                "resolved": resolved,
                "detection": detection,
                "config_files": config_files,
            }))?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            println!("{}", resolved);
        }
        OutputFormat::Table => {
            println!("{}: {}", "Path".cyan(), project_dir.display());
            println!();

            match detection.detected {
                Some(detected) => println!("{}: {}", "Detected".green(), detected),
                None => println!(
                    "{}: none (using {})",
                    "Detected".yellow(),
                    resolved
                ),
            }
            if detection.detected != Some(resolved) && detection.detected.is_some() {
                println!("{}: {} (from configuration)", "Using".cyan(), resolved);
            }
            if let Some(ref package) = detection.package {
                println!("{}: {}", "Package".cyan(), package);
            }

            println!();
            println!("{}:", "Files Found".cyan());
            let files = &detection.files_found;
            for (found, name) in [
                (files.pyproject, "pyproject.toml"),
                (files.poetry_lock, "poetry.lock"),
                (files.uv_lock, "uv.lock"),
                (files.setup_py, "setup.py"),
                (files.requirements_txt, "requirements.txt"),
            ] {
                if found {
                    println!("  - {}", name);
                }
            }

            if !config_files.is_empty() {
                println!();
                println!("{}:", "Config Files".cyan());
                for path in config_files {
                    println!("  - {}", path.display());
                }
            }
        }
    }

    Ok(())
}
