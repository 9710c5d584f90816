//! Toolchain module for Python project detection
//!
//! Figures out which package manager owns a project and reads the
//! package name from `pyproject.toml`.

pub mod detect;
pub mod manager;
pub mod pyproject;

pub use detect::*;
pub use manager::PackageManager;
pub use pyproject::PyProject;
