//! Check the registry for a newer cut-release before releasing.
//!
//! The lookup is best effort: any network or parse failure means "no update".

use std::time::Duration;

use semver::Version;
use serde::Deserialize;

use crate::config::SelfUpdateConfig;
use crate::domain::Command;
use crate::error::{ReleaseError, Result};

/// Name the tool is published and installed under
pub const CRATE_NAME: &str = "cut-release";

/// Where the latest published version of the tool comes from
pub trait UpdateSource {
    fn latest_version(&self) -> Result<Version>;
}

#[derive(Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
}

#[derive(Deserialize)]
struct CrateInfo {
    max_stable_version: Option<String>,
    max_version: String,
}

/// Looks up the newest stable release on a crates.io compatible registry.
pub struct CratesIoSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl CratesIoSource {
    pub fn new(config: &SelfUpdateConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("cut-release/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::self_update(e.to_string()))?;

        Ok(CratesIoSource {
            client,
            url: format!("{}/{}", config.registry.trim_end_matches('/'), CRATE_NAME),
        })
    }
}

impl UpdateSource for CratesIoSource {
    fn latest_version(&self) -> Result<Version> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| ReleaseError::self_update(e.to_string()))?;

        parse_latest(&body)
    }
}

/// Extract the newest version from a registry crate document
pub fn parse_latest(body: &str) -> Result<Version> {
    let response: CrateResponse = serde_json::from_str(body)?;
    let latest = response
        .krate
        .max_stable_version
        .unwrap_or(response.krate.max_version);

    Version::parse(&latest)
        .map_err(|e| ReleaseError::self_update(format!("registry returned '{}': {}", latest, e)))
}

/// The newer version to update to, if any. Lookup failures are logged and
/// treated as "up to date".
pub fn available_update(source: &dyn UpdateSource, current: &Version) -> Option<Version> {
    match source.latest_version() {
        Ok(latest) if latest > *current => Some(latest),
        Ok(latest) => {
            log::debug!("cut-release {} is up to date (latest {})", current, latest);
            None
        }
        Err(e) => {
            log::debug!("skipping self update: {}", e);
            None
        }
    }
}

/// Command that replaces the installed binary with the latest release
pub fn install_command() -> Command {
    Command::new("cargo", ["install", CRATE_NAME, "--force"])
}


#[cfg(test)]
mod tests {
    use super::fake::FixedSource;
    use super::*;

    #[test]
    fn test_parse_prefers_stable() {
        let body = r#"{"crate": {"name": "cut-release", "max_version": "0.3.0-beta.1", "max_stable_version": "0.2.1"}}"#;
        assert_eq!(parse_latest(body).unwrap(), Version::new(0, 2, 1));
    }

    #[test]
    fn test_parse_without_stable_release() {
        let body = r#"{"crate": {"max_version": "0.1.0-alpha.0", "max_stable_version": null}}"#;
        assert_eq!(parse_latest(body).unwrap().to_string(), "0.1.0-alpha.0");
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(parse_latest("<html>").unwrap_err(), ReleaseError::Json(_)));
    }

    #[test]
    fn test_only_strictly_newer_is_offered() {
        let current = Version::new(1, 0, 0);
        assert_eq!(
            available_update(&FixedSource(Some(Version::new(1, 0, 1))), &current),
            Some(Version::new(1, 0, 1))
        );
        assert_eq!(available_update(&FixedSource(Some(current.clone())), &current), None);
        assert_eq!(available_update(&FixedSource(Some(Version::new(0, 9, 0))), &current), None);
    }

    #[test]
    fn test_lookup_failure_is_ignored() {
        assert_eq!(available_update(&FixedSource(None), &Version::new(1, 0, 0)), None);
    }

    #[test]
    fn test_install_command() {
        assert_eq!(install_command().to_string(), "cargo install cut-release --force");
    }

    #[test]
    fn test_source_url() {
        let config = SelfUpdateConfig {
            registry: "https://example.test/api/".to_string(),
            ..Default::default()
        };
        let source = CratesIoSource::new(&config).unwrap();
        assert_eq!(source.url, "https://example.test/api/cut-release");
    }
}
