use crate::domain::Version;
use crate::error::{BumpError, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Version pattern searched for on every line of git output
pub const VERSION_PATTERN: &str = r"v?([0-9]+)\.([0-9]+)\.([0-9]+)";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// Extract the first version found on a single line.
///
/// # Returns
/// * `Ok(Some(Version))` - The line holds a version
/// * `Ok(None)` - No version on the line
/// * `Err(VersionOutOfRange)` - A matched component does not fit in a `u64`
pub fn parse_version(line: &str) -> Result<Option<Version>> {
    let Some(caps) = version_regex().captures(line) else {
        return Ok(None);
    };
    let component = |i: usize| {
        caps[i]
            .parse::<u64>()
            .map_err(|_| BumpError::VersionOutOfRange(caps[0].to_string()))
    };

    Ok(Some(Version::new(component(1)?, component(2)?, component(3)?)))
}

/// Parse line-oriented text (e.g. `git tag` or `git ls-remote --tags`)
/// into versions sorted ascending.
///
/// Each line contributes at most one version. Lines without a version are
/// ignored and duplicates from distinct lines are kept. A version whose
/// components do not fit in a `u64` fails the whole parse.
///
/// # Example
/// ```
/// use bumpversion::domain::{parse_versions, Version};
///
/// let listing = "a8545a6c\trefs/tags/v1.0.0\n4a3ba460\trefs/tags/v0.1.0\n";
/// assert_eq!(
///     parse_versions(listing).unwrap(),
///     vec![Version::new(0, 1, 0), Version::new(1, 0, 0)]
/// );
/// ```
pub fn parse_versions(text: &str) -> Result<Vec<Version>> {
    let mut versions = Vec::new();
    for line in text.lines() {
        if let Some(version) = parse_version(line)? {
            versions.push(version);
        }
    }
    versions.sort();
    Ok(versions)
}

/// Snapshot of the version tags known to one side (local or remote),
/// deduplicated and sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    versions: BTreeSet<Version>,
}

impl TagSet {
    /// Build a tag set from git output
    pub fn parse(text: &str) -> Result<Self> {
        Ok(parse_versions(text)?.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Highest version in the set
    pub fn latest(&self) -> Option<Version> {
        self.versions.last().copied()
    }

    /// Whether both sets hold exactly the same versions
    pub fn is_consistent_with(&self, other: &TagSet) -> bool {
        self.versions == other.versions
    }

    /// Versions only in `self` and versions only in `other`
    pub fn difference(&self, other: &TagSet) -> (Vec<Version>, Vec<Version>) {
        (
            self.versions.difference(&other.versions).copied().collect(),
            other.versions.difference(&self.versions).copied().collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    pub fn into_vec(self) -> Vec<Version> {
        self.versions.into_iter().collect()
    }
}

impl FromIterator<Version> for TagSet {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        TagSet {
            versions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u64, minor: u64, patch: u64) -> Version {
        Version::new(major, minor, patch)
    }

    #[test]
    fn test_parse_without_versions() {
        assert!(parse_versions("").unwrap().is_empty());
        assert!(parse_versions("test").unwrap().is_empty());
        assert!(parse_versions("test\ntest").unwrap().is_empty());
        assert!(parse_versions("v1.2\nrelease").unwrap().is_empty());
    }

    #[test]
    fn test_parse_single() {
        assert_eq!(parse_versions("v1.0.0").unwrap(), vec![v(1, 0, 0)]);
        assert_eq!(parse_versions("1.0.0").unwrap(), vec![v(1, 0, 0)]);
    }

    #[test]
    fn test_parse_sorts_tag_list() {
        let text = "
            v1.0.0
            v0.0.1
            v0.1.0
        ";
        assert_eq!(parse_versions(text).unwrap(), vec![v(0, 0, 1), v(0, 1, 0), v(1, 0, 0)]);
    }

    #[test]
    fn test_parse_ls_remote_output() {
        let text = "
a8545a6c6210ba1fdf6081bf2292c8d01cb6af9f\trefs/tags/v1.0.0
4a3ba460ffcb84477615ed0bba9f30d040fd10f1\trefs/tags/v0.0.1
ef3fe16be2ea20f7dcb77afba83bee2cb02be723\trefs/tags/v0.1.0
";
        assert_eq!(parse_versions(text).unwrap(), vec![v(0, 0, 1), v(0, 1, 0), v(1, 0, 0)]);
    }

    #[test]
    fn test_parse_is_numeric_not_lexical() {
        let text = "v0.10.0\nv0.9.0\nv0.2.0";
        assert_eq!(parse_versions(text).unwrap(), vec![v(0, 2, 0), v(0, 9, 0), v(0, 10, 0)]);
    }

    #[test]
    fn test_parse_first_match_per_line() {
        assert_eq!(parse_versions("v2.0.0 v3.0.0").unwrap(), vec![v(2, 0, 0)]);
    }

    #[test]
    fn test_parse_keeps_duplicates_from_distinct_lines() {
        let text = "abc\trefs/tags/v1.0.0\nabc\trefs/tags/v1.0.0^{}";
        assert_eq!(parse_versions(text).unwrap(), vec![v(1, 0, 0), v(1, 0, 0)]);
    }

    #[test]
    fn test_parse_rejects_overflowing_component() {
        let text = "v1.0.0\nabc\trefs/tags/v99999999999999999999.0.0";
        match parse_versions(text) {
            Err(BumpError::VersionOutOfRange(version)) => {
                assert_eq!(version, "v99999999999999999999.0.0")
            }
            other => panic!("expected VersionOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_accepts_largest_component() {
        let text = format!("v{}.0.0", u64::MAX);
        assert_eq!(parse_versions(&text).unwrap(), vec![v(u64::MAX, 0, 0)]);
    }

    #[test]
    fn test_parse_round_trip() {
        let original = parse_versions("x v3.1.4 y\nv0.0.7\n1.2.3\nnothing here").unwrap();
        let rendered = original
            .iter()
            .map(Version::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_versions(&rendered).unwrap(), original);
    }

    #[test]
    fn test_tag_set_permutations_are_consistent() {
        let local = TagSet::parse("v0.1.0\nv1.0.0\nv0.0.1").unwrap();
        let remote = TagSet::parse("v1.0.0\nv0.0.1\nv0.1.0").unwrap();
        assert!(local.is_consistent_with(&remote));
        assert_eq!(local.latest(), Some(v(1, 0, 0)));
    }

    #[test]
    fn test_tag_set_deduplicates() {
        let local = TagSet::parse("v1.0.0").unwrap();
        let remote = TagSet::parse("oid\trefs/tags/v1.0.0\noid\trefs/tags/v1.0.0^{}").unwrap();
        assert_eq!(remote.len(), 1);
        assert!(local.is_consistent_with(&remote));
    }

    #[test]
    fn test_tag_set_inconsistent_cases() {
        let base = TagSet::parse("v1.0.0\nv1.1.0").unwrap();
        let extra = TagSet::parse("v1.0.0\nv1.1.0\nv1.2.0").unwrap();
        let missing = TagSet::parse("v1.0.0").unwrap();
        let substituted = TagSet::parse("v1.0.0\nv1.1.1").unwrap();

        assert!(!base.is_consistent_with(&extra));
        assert!(!base.is_consistent_with(&missing));
        assert!(!base.is_consistent_with(&substituted));
    }

    #[test]
    fn test_tag_set_difference() {
        let local = TagSet::parse("v1.0.0\nv1.0.1").unwrap();
        let remote = TagSet::parse("v1.0.0\nv1.1.0").unwrap();
        let (local_only, remote_only) = local.difference(&remote);
        assert_eq!(local_only, vec![v(1, 0, 1)]);
        assert_eq!(remote_only, vec![v(1, 1, 0)]);
    }

    #[test]
    fn test_empty_tag_set() {
        let set = TagSet::parse("").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.latest(), None);
        assert!(set.into_vec().is_empty());
    }
}
