//! Queries against the npm CLI and parsers for their textual output.
//!
//! The parsers are pure; the query functions only add the runner call and
//! treat a failing command as "nothing known".

use crate::domain::Command;
use crate::exec::{capture, CommandRunner};
use semver::Version;

/// Parse `npm show . versions`.
///
/// npm prints a single bare version for packages with one release, and a
/// JavaScript-style array with single quotes otherwise. Unparsable entries are
/// skipped.
pub fn parse_published_versions(output: &str) -> Vec<Version> {
    let trimmed = output.trim();
    let entries: Vec<String> = if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(&trimmed.replace('\'', "\"")) {
            Ok(list) => list,
            Err(_) => trimmed
                .trim_matches(|c| c == '[' || c == ']')
                .split(',')
                .map(String::from)
                .collect(),
        }
    } else {
        trimmed.split_whitespace().map(String::from).collect()
    };

    entries
        .iter()
        .filter_map(|entry| {
            let cleaned: String = entry
                .chars()
                .filter(|c| c.is_ascii_digit() || c.is_ascii_alphabetic() || matches!(c, '.' | '-' | '+'))
                .collect();
            Version::parse(&cleaned).ok()
        })
        .collect()
}

/// Prerelease identifier of the most recently published `<id>.<n>` prerelease
pub fn infer_preid(versions: &[Version]) -> Option<String> {
    versions
        .iter()
        .rev()
        .filter(|v| v.pre.as_str().split('.').count() > 1)
        .find_map(|v| v.pre.as_str().split('.').next().map(String::from))
}

/// Parse `npm dist-tag ls` (`<tag>: <version>` per line) into tag names.
///
/// With `prerelease` set, `latest` is replaced by a leading `prerelease`
/// entry. Duplicates are dropped, first occurrence wins.
pub fn parse_dist_tags(output: &str, prerelease: bool) -> Vec<String> {
    let mut tags: Vec<String> = output
        .lines()
        .filter_map(|line| line.split(':').next())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    if prerelease {
        if let Some(pos) = tags.iter().position(|t| t == "latest") {
            tags.remove(pos);
            tags.insert(0, "prerelease".to_string());
        }
    }

    let mut seen = std::collections::HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
    tags
}

/// Versions of the current package already on the registry
pub fn published_versions(runner: &dyn CommandRunner) -> Vec<Version> {
    capture(runner, &Command::new("npm", ["show", ".", "versions"]))
        .map(|out| parse_published_versions(&out))
        .unwrap_or_default()
}

/// Distribution tags of the current package; empty for unpublished packages
pub fn dist_tags(runner: &dyn CommandRunner, prerelease: bool) -> Vec<String> {
    capture(runner, &Command::new("npm", ["dist-tag", "ls"]))
        .map(|out| parse_dist_tags(&out, prerelease))
        .unwrap_or_default()
}
