use crate::error::{ReleaseError, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Manifest file the release is cut for
pub const PACKAGE_FILE: &str = "package.json";

/// The fields of `package.json` a release needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: semver::Version,
}

#[derive(Deserialize)]
struct RawPackage {
    name: String,
    version: String,
}

impl PackageMetadata {
    /// Read `package.json` from `dir`.
    ///
    /// A missing or unreadable file is [`ReleaseError::MissingMetadata`];
    /// a version that is not semver is [`ReleaseError::InvalidVersion`].
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(PACKAGE_FILE);

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReleaseError::missing_metadata(
                "No package.json exists in current working directory",
            ),
            _ => ReleaseError::missing_metadata(format!(
                "Unable to read package.json from current working directory: {}",
                e
            )),
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawPackage = serde_json::from_str(content).map_err(|e| {
            ReleaseError::missing_metadata(format!(
                "Unable to read package.json from current working directory: {}",
                e
            ))
        })?;

        let version = semver::Version::parse(raw.version.trim()).map_err(|e| {
            ReleaseError::invalid_version(format!(
                "package.json version '{}' is not a semantic version: {}",
                raw.version, e
            ))
        })?;

        Ok(PackageMetadata {
            name: raw.name,
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_package() {
        let pkg = PackageMetadata::parse(r#"{"name": "left-pad", "version": "1.2.3", "main": "index.js"}"#)
            .unwrap();
        assert_eq!(pkg.name, "left-pad");
        assert_eq!(pkg.version, semver::Version::new(1, 2, 3));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = PackageMetadata::load(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::MissingMetadata(_)));
        assert!(err.to_string().contains("No package.json exists"));
    }

    #[test]
    fn test_missing_fields() {
        let err = PackageMetadata::parse(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, ReleaseError::MissingMetadata(_)));
    }

    #[test]
    fn test_bad_version() {
        let err = PackageMetadata::parse(r#"{"name": "x", "version": "latest"}"#).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidVersion(_)));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PACKAGE_FILE),
            r#"{"name": "demo", "version": "0.4.0-beta.1"}"#,
        )
        .unwrap();

        let pkg = PackageMetadata::load(dir.path()).unwrap();
        assert_eq!(pkg.version.to_string(), "0.4.0-beta.1");
    }
}
