//! Removal of build artifacts and caches
//!
//! Expands glob patterns relative to the project directory and deletes
//! whatever matches. Matching nothing is not an error.

use std::path::{Component, Path, PathBuf};

use glob::MatchOptions;
use serde::Serialize;

use crate::error::DispatchError;

/// Outcome of a clean run
#[derive(Debug, Default, Clone, Serialize)]
pub struct CleanReport {
    /// Paths removed, relative to the project directory
    pub removed: Vec<PathBuf>,
}

/// Reject patterns that could reach outside the project directory
fn check_pattern(pattern: &str) -> Result<(), DispatchError> {
    let invalid = |reason: &str| DispatchError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    if pattern.trim().is_empty() {
        return Err(invalid("empty pattern"));
    }

    let path = Path::new(pattern);
    for component in path.components() {
        match component {
            Component::ParentDir => return Err(invalid("'..' is not allowed")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("absolute paths are not allowed"))
            }
            _ => {}
        }
    }

    if pattern == "." || pattern.chars().all(|c| c == '*' || c == '/') {
        return Err(invalid("pattern would match the whole project"));
    }

    Ok(())
}

/// Remove every path under `project_dir` matching one of `patterns`
///
/// All patterns are checked before anything is deleted. Symlinks are
/// removed, never followed.
pub fn clean(project_dir: &Path, patterns: &[String]) -> Result<CleanReport, DispatchError> {
    for pattern in patterns {
        check_pattern(pattern)?;
    }

    let root = project_dir.canonicalize()?;
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut report = CleanReport::default();

    for pattern in patterns {
        // Collect before deleting so the walk never descends into removed dirs
        let matches: Vec<PathBuf> = glob::glob_with(&escape_root(&root, pattern), options)
            .map_err(|e| DispatchError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Skipping unreadable path: {}", e);
                    None
                }
            })
            .collect();

        for path in matches {
            // A parent matched earlier may already be gone
            let Ok(metadata) = std::fs::symlink_metadata(&path) else {
                continue;
            };

            if !is_inside(&root, &path) {
                tracing::warn!("Refusing to remove {}", path.display());
                continue;
            }

            if metadata.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }

            let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            tracing::info!("Removed {}", relative.display());
            report.removed.push(relative);
        }
    }

    Ok(report)
}

/// Whether `path` lies strictly inside `root` once symlinked parents are resolved
fn is_inside(root: &Path, path: &Path) -> bool {
    if path == root || !path.starts_with(root) {
        return false;
    }
    path.parent()
        .and_then(|parent| parent.canonicalize().ok())
        .is_some_and(|parent| parent.starts_with(root))
}

/// Full glob for `pattern` under `root`, with the root itself escaped
fn escape_root(root: &Path, pattern: &str) -> String {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    format!("{}/{}", escaped_root.trim_end_matches('/'), pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn python_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("dist/pkg-0.1.0.tar.gz"), "x").unwrap();
        fs::create_dir_all(root.join("make_api_request.egg-info")).unwrap();
        fs::create_dir_all(root.join("src/pkg/__pycache__")).unwrap();
        fs::write(root.join("src/pkg/__pycache__/mod.cpython-312.pyc"), "x").unwrap();
        fs::write(root.join("src/pkg/mod.py"), "x = 1\n").unwrap();
        fs::write(root.join("src/pkg/stray.pyc"), "x").unwrap();
        fs::create_dir_all(root.join(".pytest_cache")).unwrap();
        fs::write(root.join(".coverage"), "x").unwrap();
        dir
    }

    #[test]
    fn test_clean_default_style_patterns() {
        let dir = python_project();
        let root = dir.path();

        let report = clean(
            root,
            &patterns(&[
                "dist",
                "*.egg-info",
                ".pytest_cache",
                ".coverage",
                "**/__pycache__",
                "**/*.pyc",
            ]),
        )
        .unwrap();

        assert!(!root.join("dist").exists());
        assert!(!root.join("make_api_request.egg-info").exists());
        assert!(!root.join("src/pkg/__pycache__").exists());
        assert!(!root.join("src/pkg/stray.pyc").exists());
        assert!(!root.join(".pytest_cache").exists());
        assert!(!root.join(".coverage").exists());

        // Sources survive
        assert!(root.join("src/pkg/mod.py").exists());
        assert!(report.removed.contains(&PathBuf::from("dist")));
        assert!(report.removed.contains(&PathBuf::from("src/pkg/stray.pyc")));
    }

    #[test]
    fn test_clean_nothing_to_remove() {
        let dir = TempDir::new().unwrap();
        let report = clean(dir.path(), &patterns(&["dist", "**/__pycache__"])).unwrap();
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_clean_rejects_parent_dir() {
        let dir = TempDir::new().unwrap();
        let err = clean(dir.path(), &patterns(&["dist", "../elsewhere"])).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidPattern { .. }));
    }

    #[test]
    fn test_clean_rejects_absolute_and_whole_project() {
        let dir = TempDir::new().unwrap();
        for bad in ["/tmp/dist", ".", "*", "**", ""] {
            assert!(
                clean(dir.path(), &patterns(&[bad])).is_err(),
                "pattern {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_clean_checks_all_patterns_before_deleting() {
        let dir = python_project();
        let result = clean(dir.path(), &patterns(&["dist", "../x"]));

        assert!(result.is_err());
        assert!(dir.path().join("dist").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_does_not_follow_symlinks() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("keep.txt"), "keep").unwrap();

        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("build")).unwrap();

        clean(dir.path(), &patterns(&["build"])).unwrap();

        assert!(!dir.path().join("build").exists());
        assert!(outside.path().join("keep.txt").exists());
    }
}
