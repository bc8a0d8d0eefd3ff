use thiserror::Error;

use crate::exec::SequenceError;

/// Unified error type for cut-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    MissingMetadata(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("There are uncommitted changes in your local repo. Commit or revert before you cut a new release.")]
    DirtyWorkingTree,

    #[error(
        "The local branch {local} ({}) is not in sync with {remote} ({}). Run \"git pull --rebase {}\" before releasing.",
        short_sha(.local_sha),
        short_sha(.remote_sha),
        pull_target(.remote)
    )]
    OutOfSync {
        local: String,
        remote: String,
        local_sha: String,
        remote_sha: String,
    },

    #[error("The git tag {tag} already exists")]
    TagConflict { tag: String },

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Self-update check failed: {0}")]
    SelfUpdate(String),
}

/// Convenience type alias for Results in cut-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

fn short_sha(sha: &str) -> &str {
    if sha.len() > 7 {
        &sha[..7]
    } else {
        sha
    }
}

fn pull_target(remote: &str) -> String {
    remote.replacen('/', " ", 1)
}

impl ReleaseError {
    pub fn usage(msg: impl Into<String>) -> Self {
        ReleaseError::Usage(msg.into())
    }

    pub fn missing_metadata(msg: impl Into<String>) -> Self {
        ReleaseError::MissingMetadata(msg.into())
    }

    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        ReleaseError::Prompt(msg.into())
    }

    pub fn self_update(msg: impl Into<String>) -> Self {
        ReleaseError::SelfUpdate(msg.into())
    }

    /// Process exit status for this error. Every failure exits with 1;
    /// a declined confirmation never reaches this path.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
