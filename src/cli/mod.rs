//! Command line surface
//!
//! - [Args]: clap definition of the flags
//! - [ReleaseOptions]: validated options handed to the workflow
//! - [orchestration]: the release workflow itself

pub mod orchestration;

pub use orchestration::{ReleaseWorkflow, WorkflowOutcome};

use clap::Parser;

use crate::domain::{Increment, SEMVER_INCREMENTS};
use crate::error::{ReleaseError, Result};

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(
    name = "cut-release",
    about = "Bump the package version, push it and publish it to npm",
    override_usage = "cut-release [increment] [options]",
    after_help = "Supported increments: <semver>, patch, minor, major, prepatch, preminor, premajor, prerelease",
    disable_version_flag = true
)]
pub struct Args {
    #[arg(help = "Increment keyword or an explicit version")]
    pub increment: Option<String>,

    #[arg(short, long, help = "Skip confirmation when present")]
    pub yes: bool,

    #[arg(short, long, help = "NPM tag for the release (i.e. latest, next)")]
    pub tag: Option<String>,

    #[arg(short, long, help = "NPM prerelease identifier (i.e. rc, alpha, beta)")]
    pub preid: Option<String>,

    #[arg(short, long, help = "Print commands to be run, but don't run them")]
    pub dry_run: bool,

    #[arg(
        short,
        long,
        help = "Version commit message - the %s variable will be replaced with the version"
    )]
    pub message: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(short, long, help = "Print version information")]
    pub version: bool,
}

/// Options of one release run, already checked for consistency
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseOptions {
    pub increment: Option<Increment>,
    pub preid: Option<String>,
    /// `Some("")` asks for the tag instead of using the default
    pub tag: Option<String>,
    pub yes: bool,
    pub dry_run: bool,
    pub message: Option<String>,
}

impl Args {
    /// Validate the flag combination. Fails with [ReleaseError::Usage] before
    /// anything is prompted or run.
    pub fn validate(&self) -> Result<ReleaseOptions> {
        let increment = match self.increment.as_deref() {
            Some(raw) => Some(raw.parse::<Increment>().map_err(|_| {
                ReleaseError::usage(format!(
                    "The increment must be a valid semantic version, {}",
                    SEMVER_INCREMENTS.join(", ")
                ))
            })?),
            None => None,
        };

        check_preid(increment.as_ref(), self.preid.as_deref())?;

        Ok(ReleaseOptions {
            increment,
            preid: self.preid.clone(),
            tag: self.tag.clone(),
            yes: self.yes,
            dry_run: self.dry_run,
            message: self.message.clone(),
        })
    }
}

/// A prerelease identifier only makes sense with a "pre*" increment
pub(crate) fn check_preid(increment: Option<&Increment>, preid: Option<&str>) -> Result<()> {
    if preid.is_some() && !increment.is_some_and(Increment::is_pre) {
        return Err(ReleaseError::usage(
            "The --preid argument can only be used with increments that start with \"pre\", such as \"prerelease\".",
        ));
    }
    Ok(())
}
