use crate::domain::find_version_tag;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use log::{debug, info};
use semver::Version;

/// Outcome of checking for a pre-existing release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagResolution {
    /// No tag names the target version
    NoConflict,
    /// A leftover tag on HEAD from an aborted run; deleted unless dry-run
    RemovedStale { tag: String },
}

/// Detects tags that already name the version about to be released.
pub struct TagConflictResolver<'a> {
    repo: &'a dyn Repository,
    dry_run: bool,
}

impl<'a> TagConflictResolver<'a> {
    pub fn new(repo: &'a dyn Repository, dry_run: bool) -> Self {
        TagConflictResolver { repo, dry_run }
    }

    /// A tag on HEAD is stale and gets deleted; a tag anywhere else is a real
    /// collision and fails with [`ReleaseError::TagConflict`].
    pub fn resolve_tag_conflict(&self, target: &Version) -> Result<TagResolution> {
        let tags = self.repo.list_tags()?;

        let Some(tag) = find_version_tag(&tags, target) else {
            debug!("no existing tag for {}", target);
            return Ok(TagResolution::NoConflict);
        };

        let tag_oid = self.repo.find_tag_oid(&tag)?;
        let head_oid = self.repo.head_oid()?;

        if tag_oid != Some(head_oid) {
            return Err(ReleaseError::TagConflict { tag });
        }

        if self.dry_run {
            info!("would delete stale tag {} pointing at HEAD", tag);
        } else {
            info!("deleting stale tag {} pointing at HEAD", tag);
            self.repo.delete_tag(&tag)?;
        }

        Ok(TagResolution::RemovedStale { tag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use git2::Oid;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_no_conflict() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.2.2", oid(1));

        let resolver = TagConflictResolver::new(&repo, false);
        assert_eq!(
            resolver.resolve_tag_conflict(&v("1.2.3")).unwrap(),
            TagResolution::NoConflict
        );
        assert!(repo.has_tag("v1.2.2"));
    }

    #[test]
    fn test_stale_tag_on_head_is_deleted() {
        let mut repo = MockRepository::new();
        repo.set_head(oid(7));
        repo.add_tag("v1.2.3", oid(7));

        let resolver = TagConflictResolver::new(&repo, false);
        let resolution = resolver.resolve_tag_conflict(&v("1.2.3")).unwrap();

        assert_eq!(
            resolution,
            TagResolution::RemovedStale {
                tag: "v1.2.3".to_string()
            }
        );
        assert!(!repo.has_tag("v1.2.3"));
    }

    #[test]
    fn test_tag_on_other_commit_is_fatal() {
        let mut repo = MockRepository::new();
        repo.set_head(oid(7));
        repo.add_tag("v1.2.3", oid(3));

        let resolver = TagConflictResolver::new(&repo, false);
        let err = resolver.resolve_tag_conflict(&v("1.2.3")).unwrap_err();

        assert!(matches!(err, ReleaseError::TagConflict { ref tag } if tag == "v1.2.3"));
        assert!(repo.has_tag("v1.2.3"));
    }

    #[test]
    fn test_dry_run_keeps_stale_tag() {
        let mut repo = MockRepository::new();
        repo.set_head(oid(7));
        repo.add_tag("v1.2.3", oid(7));

        let resolver = TagConflictResolver::new(&repo, true);
        assert!(matches!(
            resolver.resolve_tag_conflict(&v("1.2.3")).unwrap(),
            TagResolution::RemovedStale { .. }
        ));
        assert!(repo.has_tag("v1.2.3"));
    }

    #[test]
    fn test_unprefixed_tag_matches() {
        let mut repo = MockRepository::new();
        repo.set_head(oid(7));
        repo.add_tag("1.2.3", oid(3));

        let resolver = TagConflictResolver::new(&repo, false);
        assert!(resolver.resolve_tag_conflict(&v("1.2.3")).is_err());
    }
}
