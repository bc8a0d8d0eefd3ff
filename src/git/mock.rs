use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    dirty: bool,
    head: Oid,
    branch: Option<String>,
    upstreams: HashMap<String, String>,
    remotes: Vec<String>,
    branch_heads: HashMap<String, Oid>,
    remote_heads: HashMap<String, Oid>,
    tags: RefCell<HashMap<String, Oid>>,
    fetch_error: Option<String>,
    fetches: Cell<usize>,
}

impl MockRepository {
    /// Create a new clean mock repository on branch "main"
    pub fn new() -> Self {
        MockRepository {
            dirty: false,
            head: Oid::zero(),
            branch: Some("main".to_string()),
            upstreams: HashMap::new(),
            remotes: Vec::new(),
            branch_heads: HashMap::new(),
            remote_heads: HashMap::new(),
            tags: RefCell::new(HashMap::new()),
            fetch_error: None,
            fetches: Cell::new(0),
        }
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn set_head(&mut self, oid: Oid) {
        self.head = oid;
    }

    /// Set the checked-out branch, `None` for a detached HEAD
    pub fn set_current_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(String::from);
    }

    pub fn set_upstream(&mut self, branch: impl Into<String>, upstream: impl Into<String>) {
        self.upstreams.insert(branch.into(), upstream.into());
    }

    pub fn add_remote(&mut self, name: impl Into<String>) {
        self.remotes.push(name.into());
    }

    pub fn set_branch_head(&mut self, branch: impl Into<String>, oid: Oid) {
        self.branch_heads.insert(branch.into(), oid);
    }

    pub fn set_remote_head(&mut self, remote: &str, branch: &str, oid: Oid) {
        self.remote_heads.insert(format!("{}/{}", remote, branch), oid);
    }

    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.get_mut().insert(name.into(), oid);
    }

    pub fn fail_fetch(&mut self, message: impl Into<String>) {
        self.fetch_error = Some(message.into());
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.borrow().contains_key(name)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(what: String) -> ReleaseError {
    ReleaseError::Git(git2::Error::new(
        git2::ErrorCode::NotFound,
        git2::ErrorClass::Reference,
        what,
    ))
}

impl Repository for MockRepository {
    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn head_oid(&self) -> Result<Oid> {
        Ok(self.head)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn upstream_of(&self, branch: &str) -> Result<Option<String>> {
        Ok(self.upstreams.get(branch).cloned())
    }

    fn list_remotes(&self) -> Result<Vec<String>> {
        Ok(self.remotes.clone())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.fetches.set(self.fetches.get() + 1);
        match &self.fetch_error {
            Some(message) => Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "fetch from {} failed: {}",
                remote, message
            )))),
            None => Ok(()),
        }
    }

    fn branch_oid(&self, branch: &str) -> Result<Oid> {
        self.branch_heads
            .get(branch)
            .copied()
            .ok_or_else(|| not_found(format!("Branch not found: {}", branch)))
    }

    fn remote_branch_oid(&self, remote: &str, branch: &str) -> Result<Oid> {
        let name = format!("{}/{}", remote, branch);
        self.remote_heads
            .get(&name)
            .copied()
            .ok_or_else(|| not_found(format!("Remote branch not found: {}", name)))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self.tags.borrow().keys().cloned().collect();
        tags.sort();
        Ok(tags)
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.borrow().get(tag_name).copied())
    }

    fn delete_tag(&self, tag_name: &str) -> Result<()> {
        self.tags
            .borrow_mut()
            .remove(tag_name)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Tag not found: {}", tag_name)))
    }
}
