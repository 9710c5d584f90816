//! Common test utilities for devcmd tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Creates a temporary poetry project (pyproject with `[tool.poetry]` and a lock file)
pub fn create_poetry_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("pyproject.toml"), SAMPLE_PYPROJECT)
        .expect("Failed to write pyproject.toml");
    std::fs::write(dir.path().join("poetry.lock"), "").expect("Failed to write poetry.lock");
    let path = dir.path().to_path_buf();
    (dir, path)
}

/// Creates a temporary uv project (PEP 621 pyproject and `uv.lock`)
pub fn create_uv_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("pyproject.toml"), SAMPLE_UV_PYPROJECT)
        .expect("Failed to write pyproject.toml");
    std::fs::write(dir.path().join("uv.lock"), "version = 1\n").expect("Failed to write uv.lock");
    let path = dir.path().to_path_buf();
    (dir, path)
}

/// Creates a temporary directory with no project files
pub fn create_empty_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().to_path_buf();
    (dir, path)
}

/// Writes a project-level `.devcmd.toml`
pub fn write_config(dir: &Path, content: &str) {
    std::fs::write(dir.join(".devcmd.toml"), content).expect("Failed to write .devcmd.toml");
}

/// A `devcmd` command isolated from the user's config files and environment
pub fn devcmd(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("devcmd").expect("Failed to find devcmd binary");
    cmd.current_dir(project)
        .env("HOME", project)
        .env("NO_COLOR", "1")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("DEVCMD_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Sample poetry pyproject.toml
pub const SAMPLE_PYPROJECT: &str = r#"
[tool.poetry]
name = "make-api-request"
version = "0.1.0"
description = "Typed HTTP request helpers"

[tool.poetry.dependencies]
python = "^3.10"
httpx = "^0.27"

[build-system]
requires = ["poetry-core"]
build-backend = "poetry.core.masonry.api"
"#;

/// Sample PEP 621 pyproject.toml
pub const SAMPLE_UV_PYPROJECT: &str = r#"
[project]
name = "sample.tools"
version = "0.2.0"
requires-python = ">=3.10"
"#;
