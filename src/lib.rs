//! devcmd - Developer command dispatcher for Python package repositories
//!
//! Maps a fixed set of developer commands onto the tools a Python
//! project already uses:
//! - **install**, **build** - through the package manager
//! - **test**, **test-cov**, **lint**, **format**, **typecheck** - run
//!   inside the manager's environment (pytest, ruff, mypy)
//! - **clean** - removes build artifacts and caches in-process
//! - **release-patch**, **release-minor**, **release-major**, **release** -
//!   run the project's release script
//!
//! ## Features
//!
//! - Package manager detection (poetry, uv, pip) with poetry as the fallback
//! - XDG-compliant layered configuration with per-command overrides
//! - Environment variable and shell command interpolation
//! - Exit codes of delegated tools are passed through unchanged

pub mod clean;
pub mod cli;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod logging;
pub mod toolchain;

pub use cli::{Cli, Commands};
pub use command::{Action, CommandTable, DevCommand, Invocation};
pub use config::Config;
pub use dispatch::{Dispatcher, Outcome};
pub use error::DispatchError;
pub use executor::{exec_invocation, ExecOptions, ExecResult};
pub use toolchain::{detect_manager, DetectionResult, PackageManager};
