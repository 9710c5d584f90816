//! CLI module for devcmd
//!
//! Provides the command-line interface: one subcommand per developer
//! command, plus:
//! - `list` - List commands and what they run (default with no command)
//! - `detect` - Detect the project's package manager

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::{print_detection, print_listing};
