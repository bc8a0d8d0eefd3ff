use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Semver bump keywords accepted on the command line and in the version prompt
pub const SEMVER_INCREMENTS: [&str; 7] = [
    "patch",
    "minor",
    "major",
    "prepatch",
    "preminor",
    "premajor",
    "prerelease",
];

/// A semantic-version bump keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementKind {
    Patch,
    Minor,
    Major,
    Prepatch,
    Preminor,
    Premajor,
    Prerelease,
}

impl IncrementKind {
    pub fn all() -> [IncrementKind; 7] {
        [
            IncrementKind::Patch,
            IncrementKind::Minor,
            IncrementKind::Major,
            IncrementKind::Prepatch,
            IncrementKind::Preminor,
            IncrementKind::Premajor,
            IncrementKind::Prerelease,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            IncrementKind::Patch => "patch",
            IncrementKind::Minor => "minor",
            IncrementKind::Major => "major",
            IncrementKind::Prepatch => "prepatch",
            IncrementKind::Preminor => "preminor",
            IncrementKind::Premajor => "premajor",
            IncrementKind::Prerelease => "prerelease",
        }
    }

    /// Whether this keyword belongs to the "pre*" family
    pub fn is_pre(&self) -> bool {
        self.name().starts_with("pre")
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Either a bump keyword or an explicit version to release as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Increment {
    Keyword(IncrementKind),
    Explicit(semver::Version),
}

impl Increment {
    pub fn is_pre(&self) -> bool {
        matches!(self, Increment::Keyword(kind) if kind.is_pre())
    }
}

impl FromStr for Increment {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(kind) = IncrementKind::all().into_iter().find(|k| k.name() == s) {
            return Ok(Increment::Keyword(kind));
        }

        semver::Version::parse(s)
            .map(Increment::Explicit)
            .map_err(|_| {
                ReleaseError::invalid_version(format!(
                    "'{}' must be a valid semantic version or one of: {}",
                    s,
                    SEMVER_INCREMENTS.join(", ")
                ))
            })
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Increment::Keyword(kind) => write!(f, "{}", kind),
            Increment::Explicit(version) => write!(f, "{}", version),
        }
    }
}
