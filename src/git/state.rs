use crate::domain::RemoteRef;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use log::debug;

/// Read-only precondition checks on the local repository.
///
/// A missing repository (`None`) means the package is not under version
/// control; every check then passes trivially.
pub struct RepositoryStateChecker<'a> {
    repo: Option<&'a dyn Repository>,
}

impl<'a> RepositoryStateChecker<'a> {
    pub fn new(repo: Option<&'a dyn Repository>) -> Self {
        RepositoryStateChecker { repo }
    }

    /// Fails with [`ReleaseError::DirtyWorkingTree`] when tracked files have
    /// uncommitted changes.
    pub fn check_clean(&self) -> Result<()> {
        let Some(repo) = self.repo else {
            debug!("not a git repository, skipping clean check");
            return Ok(());
        };

        if repo.is_dirty()? {
            return Err(ReleaseError::DirtyWorkingTree);
        }
        Ok(())
    }

    /// Fetch `remote` and require the tip of the local branch `local` to be
    /// the exact commit of the remote-tracking branch it is released to.
    pub fn check_sync(&self, local: &str, remote: &RemoteRef) -> Result<()> {
        let Some(repo) = self.repo else {
            return Ok(());
        };

        repo.fetch(&remote.remote)?;

        let local_oid = repo.branch_oid(local)?;
        let upstream = repo.remote_branch_oid(&remote.remote, &remote.branch)?;
        debug!("{} at {}, {} at {}", local, local_oid, remote, upstream);

        if local_oid != upstream {
            return Err(ReleaseError::OutOfSync {
                local: local.to_string(),
                remote: remote.to_string(),
                local_sha: local_oid.to_string(),
                remote_sha: upstream.to_string(),
            });
        }
        Ok(())
    }
}
