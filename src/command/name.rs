//! Developer command names

use std::str::FromStr;

use serde::Serialize;

use crate::error::DispatchError;

/// A developer command devcmd knows how to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DevCommand {
    Install,
    Test,
    TestCov,
    Lint,
    Format,
    Typecheck,
    Build,
    Clean,
    ReleasePatch,
    ReleaseMinor,
    ReleaseMajor,
    Release,
}

impl DevCommand {
    /// Every command, in listing order
    pub const ALL: [DevCommand; 12] = [
        DevCommand::Install,
        DevCommand::Test,
        DevCommand::TestCov,
        DevCommand::Lint,
        DevCommand::Format,
        DevCommand::Typecheck,
        DevCommand::Build,
        DevCommand::Clean,
        DevCommand::ReleasePatch,
        DevCommand::ReleaseMinor,
        DevCommand::ReleaseMajor,
        DevCommand::Release,
    ];

    /// Stable kebab-case name, as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            DevCommand::Install => "install",
            DevCommand::Test => "test",
            DevCommand::TestCov => "test-cov",
            DevCommand::Lint => "lint",
            DevCommand::Format => "format",
            DevCommand::Typecheck => "typecheck",
            DevCommand::Build => "build",
            DevCommand::Clean => "clean",
            DevCommand::ReleasePatch => "release-patch",
            DevCommand::ReleaseMinor => "release-minor",
            DevCommand::ReleaseMajor => "release-major",
            DevCommand::Release => "release",
        }
    }

    /// One-line description for the command listing
    pub fn description(&self) -> &'static str {
        match self {
            DevCommand::Install => "Install dependencies",
            DevCommand::Test => "Run tests",
            DevCommand::TestCov => "Run tests with coverage",
            DevCommand::Lint => "Run linting",
            DevCommand::Format => {
                "Format code; `ruff check --fix` needs a [commands.format] override"
            }
            DevCommand::Typecheck => "Run type checking",
            DevCommand::Build => "Build package",
            DevCommand::Clean => "Clean build artifacts and caches",
            DevCommand::ReleasePatch => "Release patch version (x.y.Z)",
            DevCommand::ReleaseMinor => "Release minor version (x.Y.0)",
            DevCommand::ReleaseMajor => "Release major version (X.0.0)",
            DevCommand::Release => "Release with a bump keyword or explicit version",
        }
    }

    /// Version bump forwarded to the release script
    pub fn bump(&self) -> Option<BumpKind> {
        match self {
            DevCommand::ReleasePatch => Some(BumpKind::Patch),
            DevCommand::ReleaseMinor => Some(BumpKind::Minor),
            DevCommand::ReleaseMajor => Some(BumpKind::Major),
            _ => None,
        }
    }

    /// All command names, in listing order
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(DevCommand::name).collect()
    }
}

/// Semantic version component a release bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    /// Keyword understood by the release script
    pub fn keyword(&self) -> &'static str {
        match self {
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
        }
    }
}

impl std::fmt::Display for BumpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for DevCommand {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| DispatchError::UnknownCommand {
                name: s.to_string(),
                available: Self::names().into_iter().map(str::to_string).collect(),
            })
    }
}

impl std::fmt::Display for DevCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for command in DevCommand::ALL {
            assert_eq!(command.name().parse::<DevCommand>().unwrap(), command);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = DevCommand::names();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DevCommand::ALL.len());
    }

    #[test]
    fn test_unknown_command() {
        match "deploy".parse::<DevCommand>() {
            Err(DispatchError::UnknownCommand { name, available }) => {
                assert_eq!(name, "deploy");
                assert!(available.contains(&"test-cov".to_string()));
            }
            other => panic!("Expected UnknownCommand, got {:?}", other),
        }
    }

    #[test]
    fn test_bump_kinds() {
        assert_eq!(DevCommand::ReleasePatch.bump(), Some(BumpKind::Patch));
        assert_eq!(DevCommand::ReleaseMinor.bump(), Some(BumpKind::Minor));
        assert_eq!(DevCommand::ReleaseMajor.bump().map(|b| b.keyword()), Some("major"));
        assert_eq!(DevCommand::Release.bump(), None);
        assert_eq!(DevCommand::Test.bump(), None);
    }

    #[test]
    fn test_serialize_kebab_case() {
        assert_eq!(serde_json::to_string(&DevCommand::TestCov).unwrap(), "\"test-cov\"");
        assert_eq!(
            serde_json::to_string(&DevCommand::ReleasePatch).unwrap(),
            "\"release-patch\""
        );
    }
}
