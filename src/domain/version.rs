//! Next-version computation.
//!
//! Follows the npm flavour of semver increments: bumping a prerelease of the
//! same release line finalizes it instead of skipping ahead, and prerelease
//! counters are numeric identifiers appended after the preid.

use crate::domain::increment::{Increment, IncrementKind};
use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};

/// Prerelease identifier, numeric or alphanumeric
#[derive(Debug, Clone, PartialEq, Eq)]
enum Ident {
    Numeric(u64),
    Alpha(String),
}

impl Ident {
    fn as_string(&self) -> String {
        match self {
            Ident::Numeric(n) => n.to_string(),
            Ident::Alpha(s) => s.clone(),
        }
    }
}

fn split_prerelease(pre: &Prerelease) -> Vec<Ident> {
    if pre.is_empty() {
        return Vec::new();
    }
    pre.as_str()
        .split('.')
        .map(|part| match part.parse::<u64>() {
            Ok(n) => Ident::Numeric(n),
            Err(_) => Ident::Alpha(part.to_string()),
        })
        .collect()
}

fn join_prerelease(idents: &[Ident]) -> Result<Prerelease> {
    let joined = idents
        .iter()
        .map(Ident::as_string)
        .collect::<Vec<_>>()
        .join(".");
    Prerelease::new(&joined).map_err(|e| {
        ReleaseError::invalid_version(format!("invalid prerelease '{}': {}", joined, e))
    })
}

/// Compute the concrete version to release.
///
/// Keywords bump `current`; an explicit version is returned unchanged and
/// `preid` is ignored for it.
///
/// # Example
/// ```
/// # use cut_release::domain::{resolve, Increment};
/// let current = semver::Version::parse("1.2.3").unwrap();
/// let next = resolve(&current, &"prerelease".parse::<Increment>().unwrap(), Some("rc")).unwrap();
/// assert_eq!(next.to_string(), "1.2.4-rc.0");
/// ```
pub fn resolve(current: &Version, increment: &Increment, preid: Option<&str>) -> Result<Version> {
    match increment {
        Increment::Explicit(version) => Ok(version.clone()),
        Increment::Keyword(kind) => bump(current, *kind, preid),
    }
}

/// Same as [`resolve`] but accepts the raw keyword or version text.
pub fn resolve_str(current: &Version, increment: &str, preid: Option<&str>) -> Result<Version> {
    resolve(current, &increment.parse()?, preid)
}

/// `n + 1`, or an error when the version part is already at its maximum
fn step(n: u64, current: &Version) -> Result<u64> {
    n.checked_add(1).ok_or_else(|| {
        ReleaseError::invalid_version(format!("{} cannot be incremented any further", current))
    })
}

fn bump(current: &Version, kind: IncrementKind, preid: Option<&str>) -> Result<Version> {
    let mut next = Version {
        major: current.major,
        minor: current.minor,
        patch: current.patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    };
    let mut pre = split_prerelease(&current.pre);

    match kind {
        IncrementKind::Major => {
            if next.minor != 0 || next.patch != 0 || pre.is_empty() {
                next.major = step(next.major, current)?;
            }
            next.minor = 0;
            next.patch = 0;
            pre.clear();
        }
        IncrementKind::Minor => {
            if next.patch != 0 || pre.is_empty() {
                next.minor = step(next.minor, current)?;
            }
            next.patch = 0;
            pre.clear();
        }
        IncrementKind::Patch => {
            if pre.is_empty() {
                next.patch = step(next.patch, current)?;
            }
            pre.clear();
        }
        IncrementKind::Premajor => {
            next.major = step(next.major, current)?;
            next.minor = 0;
            next.patch = 0;
            pre = bump_pre(Vec::new(), preid, current)?;
        }
        IncrementKind::Preminor => {
            next.minor = step(next.minor, current)?;
            next.patch = 0;
            pre = bump_pre(Vec::new(), preid, current)?;
        }
        IncrementKind::Prepatch => {
            next.patch = step(next.patch, current)?;
            pre = bump_pre(Vec::new(), preid, current)?;
        }
        IncrementKind::Prerelease => {
            if pre.is_empty() {
                next.patch = step(next.patch, current)?;
            }
            pre = bump_pre(pre, preid, current)?;
        }
    }

    next.pre = join_prerelease(&pre)?;
    Ok(next)
}

fn bump_pre(mut pre: Vec<Ident>, preid: Option<&str>, current: &Version) -> Result<Vec<Ident>> {
    if pre.is_empty() {
        pre.push(Ident::Numeric(0));
    } else if let Some(pos) = pre.iter().rposition(|i| matches!(i, Ident::Numeric(_))) {
        if let Ident::Numeric(n) = pre[pos] {
            pre[pos] = Ident::Numeric(step(n, current)?);
        }
    } else {
        pre.push(Ident::Numeric(0));
    }

    if let Some(id) = preid.filter(|id| !id.is_empty()) {
        let same_line = matches!(pre.first(), Some(Ident::Alpha(first)) if first == id);
        if !same_line || !matches!(pre.get(1), Some(Ident::Numeric(_))) {
            pre = vec![Ident::Alpha(id.to_string()), Ident::Numeric(0)];
        }
    }

    Ok(pre)
}
