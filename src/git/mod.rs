//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git queries a
//! release needs, so the precondition checks can run against a real
//! repository or an in-memory mock.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: a mock implementation for testing
//! - [state::RepositoryStateChecker]: clean-tree and remote-sync checks
//! - [tags::TagConflictResolver]: detection and cleanup of pre-existing release tags
//!
//! None of these rewrite history; the only mutation is deleting a stale local tag.

pub mod mock;
pub mod repository;
pub mod state;
pub mod tags;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use state::RepositoryStateChecker;
pub use tags::{TagConflictResolver, TagResolution};

use crate::error::Result;
use git2::Oid;

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]; implementations map
/// `git2::Error` into [crate::error::ReleaseError::Git].
pub trait Repository {
    /// Whether tracked files differ from HEAD in the index or working tree.
    ///
    /// Untracked files are not considered.
    fn is_dirty(&self) -> Result<bool>;

    /// OID of the commit HEAD points at
    fn head_oid(&self) -> Result<Oid>;

    /// Short name of the checked-out branch, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    /// Upstream of a local branch as `remote/branch`, if one is configured
    fn upstream_of(&self, branch: &str) -> Result<Option<String>>;

    /// Configured remote names, "origin" first
    fn list_remotes(&self) -> Result<Vec<String>>;

    /// Fetch branches and tags from a remote
    fn fetch(&self, remote: &str) -> Result<()>;

    /// OID of a local branch tip
    fn branch_oid(&self, branch: &str) -> Result<Oid>;

    /// OID of a remote-tracking branch tip (`refs/remotes/<remote>/<branch>`)
    fn remote_branch_oid(&self, remote: &str, branch: &str) -> Result<Oid>;

    /// All tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commit a tag points at, peeling annotated tags
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - Commit the tag resolves to
    /// * `Ok(None)` - If the tag doesn't exist
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Delete a local tag
    fn delete_tag(&self, tag_name: &str) -> Result<()>;
}
