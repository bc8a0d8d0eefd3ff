use crate::error::{ReleaseError, Result};
use git2::{BranchType, ErrorCode, Oid, Repository as Git2Repo, Status, StatusOptions};
use log::debug;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Like [`Git2Repository::open`], but `Ok(None)` when `path` is not under
    /// version control.
    pub fn open_if_present<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        match Git2Repo::discover(path) {
            Ok(repo) => Ok(Some(Git2Repository { repo })),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn fetch_options<'cb>() -> git2::FetchOptions<'cb> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        let mut options = git2::FetchOptions::new();
        options.remote_callbacks(callbacks);
        options.download_tags(git2::AutotagOption::Auto);
        options
    }
}

impl super::Repository for Git2Repository {
    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .any(|entry| entry.status() != Status::CURRENT && !entry.status().is_ignored()))
    }

    fn head_oid(&self) -> Result<Oid> {
        Ok(self.repo.head()?.peel_to_commit()?.id())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Ok(None);
        }
        Ok(head.shorthand().map(|s| s.to_string()))
    }

    fn upstream_of(&self, branch: &str) -> Result<Option<String>> {
        let local = self.repo.find_branch(branch, BranchType::Local)?;
        match local.upstream() {
            Ok(upstream) => Ok(upstream.name()?.map(|s| s.to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_remotes(&self) -> Result<Vec<String>> {
        let remote_names = self.repo.remotes()?;
        let mut remotes: Vec<String> = remote_names.iter().flatten().map(String::from).collect();

        remotes.sort_by(|a, b| match (a.as_str(), b.as_str()) {
            ("origin", _) => std::cmp::Ordering::Less,
            (_, "origin") => std::cmp::Ordering::Greater,
            _ => a.cmp(b),
        });

        Ok(remotes)
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        debug!("fetching from {}", remote);
        let mut handle = self.repo.find_remote(remote)?;

        let mut options = Self::fetch_options();
        handle.fetch::<&str>(&[], Some(&mut options), None)?;

        Ok(())
    }

    fn branch_oid(&self, branch: &str) -> Result<Oid> {
        let branch_ref = self.repo.find_branch(branch, BranchType::Local)?;
        branch_ref.get().target().ok_or_else(|| {
            ReleaseError::Git(git2::Error::from_str(&format!(
                "Branch '{}' has no target",
                branch
            )))
        })
    }

    fn remote_branch_oid(&self, remote: &str, branch: &str) -> Result<Oid> {
        let name = format!("{}/{}", remote, branch);
        let branch_ref = self.repo.find_branch(&name, BranchType::Remote)?;
        branch_ref.get().target().ok_or_else(|| {
            ReleaseError::Git(git2::Error::from_str(&format!(
                "Remote branch '{}' has no target",
                name
            )))
        })
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete_tag(&self, tag_name: &str) -> Result<()> {
        self.repo.tag_delete(tag_name)?;
        Ok(())
    }
}
