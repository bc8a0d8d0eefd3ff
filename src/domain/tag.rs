use semver::Version;

/// Git tag name used for a released version (e.g., "1.2.3" -> "v1.2.3")
pub fn release_tag_name(version: &Version) -> String {
    format!("v{}", version)
}

/// Parse a tag name as a semantic version, tolerating a leading "v" or "=".
pub fn parse_tag_version(tag: &str) -> Option<Version> {
    let clean = tag
        .trim()
        .trim_start_matches(['v', 'V'])
        .trim_start_matches('=');
    Version::parse(clean).ok()
}

/// Find the existing tag that names `version`, if any.
///
/// Tags that do not parse as semantic versions are ignored.
pub fn find_version_tag<'a, I>(tags: I, version: &Version) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    tags.into_iter()
        .find(|tag| parse_tag_version(tag).as_ref() == Some(version))
        .cloned()
}
