use crate::domain::increment::Increment;
use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// A `remote/branch` pair the local branch tracks or should track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub remote: String,
    pub branch: String,
}

impl RemoteRef {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        RemoteRef {
            remote: remote.into(),
            branch: branch.into(),
        }
    }
}

impl FromStr for RemoteRef {
    type Err = ReleaseError;

    /// Splits on the first '/', so branch names may themselves contain slashes.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => {
                Ok(RemoteRef::new(remote, branch))
            }
            _ => Err(ReleaseError::usage(format!(
                "Expected a remote in the form <remote>/<branch>, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// Answers gathered for one release, filled in question by question
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseAnswers {
    pub version: Option<Increment>,
    pub preid: Option<String>,
    pub tag: Option<String>,
    pub remote: Option<RemoteRef>,
    /// The remote was picked by prompt, so tracking must be configured
    pub set_remote: bool,
    pub confirm: bool,
}

impl ReleaseAnswers {
    /// True when the chosen increment is a "pre*" keyword
    pub fn wants_preid(&self) -> bool {
        self.version.as_ref().is_some_and(Increment::is_pre)
    }
}
