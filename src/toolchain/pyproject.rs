//! Read-only access to the project's `pyproject.toml`

use std::path::Path;

use toml::Value;

/// File name of the Python project manifest
pub const PYPROJECT: &str = "pyproject.toml";

/// The parts of `pyproject.toml` devcmd cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyProject {
    /// `[tool.poetry].name`, falling back to `[project].name`
    pub name: Option<String>,
    /// Whether a `[tool.poetry]` table is present
    pub has_poetry_table: bool,
}

impl PyProject {
    /// Parse manifest text; malformed TOML yields `None`
    pub fn parse(content: &str) -> Option<Self> {
        let value: Value = match content.parse() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Could not parse {}: {}", PYPROJECT, e);
                return None;
            }
        };

        let poetry = value.get("tool").and_then(|t| t.get("poetry"));
        let name = poetry
            .and_then(|p| p.get("name"))
            .or_else(|| value.get("project").and_then(|p| p.get("name")))
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            name,
            has_poetry_table: poetry.is_some(),
        })
    }

    /// Load `pyproject.toml` from a project directory, if present and readable
    pub fn load(dir: &Path) -> Option<Self> {
        let path = dir.join(PYPROJECT);
        let content = std::fs::read_to_string(&path).ok()?;
        Self::parse(&content)
    }

    /// Import name derived from the distribution name
    pub fn import_name(&self) -> Option<String> {
        self.name.as_ref().map(|n| n.replace(['-', '.'], "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_poetry_manifest() {
        let manifest = PyProject::parse(
            r#"
            [tool.poetry]
            name = "make-api-request"
            version = "0.1.0"
            "#,
        )
        .unwrap();

        assert!(manifest.has_poetry_table);
        assert_eq!(manifest.name, Some("make-api-request".to_string()));
        assert_eq!(manifest.import_name(), Some("make_api_request".to_string()));
    }

    #[test]
    fn test_parse_pep621_manifest() {
        let manifest = PyProject::parse(
            r#"
            [project]
            name = "my.pkg"
            "#,
        )
        .unwrap();

        assert!(!manifest.has_poetry_table);
        assert_eq!(manifest.import_name(), Some("my_pkg".to_string()));
    }

    #[test]
    fn test_poetry_name_wins_over_project_name() {
        let manifest = PyProject::parse(
            r#"
            [project]
            name = "pep621-name"

            [tool.poetry]
            name = "poetry-name"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.name, Some("poetry-name".to_string()));
    }

    #[test]
    fn test_parse_malformed_manifest() {
        assert!(PyProject::parse("[tool.poetry\nname = ").is_none());
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = TempDir::new().unwrap();
        assert!(PyProject::load(dir.path()).is_none());
    }
}
