use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Semantic version in the `MAJOR.MINOR.PATCH[-rcN]` subset used for release
/// tags.
///
/// `rc == 0` means a stable release; `rc > 0` identifies a release-candidate
/// ordinal within its `major.minor.patch` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub rc: u32,
}

fn lenient_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-rc(\d+))?").expect("valid regex"))
}

fn strict_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-rc([1-9]\d*))?$").expect("valid regex"))
}

impl Version {
    /// The zero version, doubling as the "no releases yet / unparsable tag"
    /// sentinel.
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        patch: 0,
        rc: 0,
    };

    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32, rc: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            rc,
        }
    }

    /// Parse a version from a tag or version string.
    ///
    /// Strips a leading `v`, then matches `MAJOR.MINOR.PATCH` with an
    /// optional `-rcN` suffix anchored at the start only; trailing garbage
    /// (`1.2.3-beta1`) is ignored. Anything that does not match at all
    /// yields [Version::ZERO] rather than an error, so an empty repository
    /// naturally starts from the zero version.
    pub fn parse(s: &str) -> Self {
        let clean = s.trim().trim_start_matches('v');

        match lenient_re().captures(clean) {
            Some(caps) => {
                let field = |i: usize| {
                    caps.get(i)
                        .and_then(|m| m.as_str().parse::<u32>().ok())
                        .unwrap_or(0)
                };
                Version::new(field(1), field(2), field(3), field(4))
            }
            None => Version::ZERO,
        }
    }

    /// Strict validity gate for user-typed versions.
    ///
    /// Unlike [Version::parse], the whole string must match: lowercase `rc`,
    /// ordinal at least 1, no trailing characters. A leading `v` is allowed.
    pub fn is_valid_semver(s: &str) -> bool {
        let clean = s.trim().trim_start_matches('v');
        strict_re().is_match(clean)
    }

    /// The release line this version belongs to, as `(major, minor)`.
    pub fn line(&self) -> (u32, u32) {
        (self.major, self.minor)
    }

    /// Whether this version is a release candidate
    pub fn is_rc(&self) -> bool {
        self.rc > 0
    }

    /// Tag name for this version (`v` prefix added here, nowhere else)
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.rc > 0 {
            write!(f, "-rc{}", self.rc)?;
        }
        Ok(())
    }
}

impl Ord for Version {
    /// Total order over versions: `major.minor.patch` by magnitude, then a
    /// stable release ranks above any release candidate of the same triple,
    /// and among candidates the higher ordinal wins.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.rc, other.rc) {
                (0, 0) => Ordering::Equal,
                (0, _) => Ordering::Greater,
                (_, 0) => Ordering::Less,
                (a, b) => a.cmp(&b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort tag strings by their parsed versions, newest first.
///
/// The sort is stable, so unparsable tags (all equal to the zero version)
/// keep their original relative order at the end of the list.
pub fn sort_tags_descending(tags: &[String]) -> Vec<String> {
    let mut sorted = tags.to_vec();
    sorted.sort_by(|a, b| Version::parse(b).cmp(&Version::parse(a)));
    sorted
}

/// The newest version among a raw tag listing, if any tag parses.
pub fn latest_version(tags: &[String]) -> Option<Version> {
    tags.iter().map(|t| Version::parse(t)).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stable() {
        assert_eq!(Version::parse("v1.2.3"), Version::new(1, 2, 3, 0));
        assert_eq!(Version::parse("1.2.3"), Version::new(1, 2, 3, 0));
    }

    #[test]
    fn test_parse_rc() {
        assert_eq!(Version::parse("v2.6.1-rc12"), Version::new(2, 6, 1, 12));
    }

    #[test]
    fn test_parse_ignores_trailing_garbage() {
        assert_eq!(Version::parse("1.2.3-beta1"), Version::new(1, 2, 3, 0));
        assert_eq!(Version::parse("v2.6.1-rc3.hotfix"), Version::new(2, 6, 1, 3));
    }

    #[test]
    fn test_parse_sentinel_on_garbage() {
        assert_eq!(Version::parse("not-a-version"), Version::ZERO);
        assert_eq!(Version::parse(""), Version::ZERO);
        assert_eq!(Version::parse("1.2"), Version::ZERO);
    }

    #[test]
    fn test_is_valid_semver_accepts() {
        assert!(Version::is_valid_semver("1.0.0"));
        assert!(Version::is_valid_semver("1.0.0-rc1"));
        assert!(Version::is_valid_semver("v2.6.1-rc12"));
    }

    #[test]
    fn test_is_valid_semver_rejects() {
        assert!(!Version::is_valid_semver(""));
        assert!(!Version::is_valid_semver("1.0"));
        assert!(!Version::is_valid_semver("1.0.0.0"));
        assert!(!Version::is_valid_semver("1.0.0-rc1-extra"));
        assert!(!Version::is_valid_semver("1.0.0-RC1"));
        assert!(!Version::is_valid_semver("1.0.0-rc0"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(2, 6, 1, 0).to_string(), "2.6.1");
        assert_eq!(Version::new(2, 6, 1, 4).to_string(), "2.6.1-rc4");
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(Version::new(2, 7, 0, 0).tag_name(), "v2.7.0");
        assert_eq!(Version::new(2, 7, 0, 1).tag_name(), "v2.7.0-rc1");
    }

    #[test]
    fn test_order_major_minor_patch() {
        assert!(Version::new(2, 0, 0, 0) > Version::new(1, 9, 9, 0));
        assert!(Version::new(1, 3, 0, 0) > Version::new(1, 2, 9, 0));
        assert!(Version::new(1, 2, 4, 0) > Version::new(1, 2, 3, 0));
    }

    #[test]
    fn test_order_stable_beats_rc() {
        assert_eq!(
            Version::new(2, 6, 1, 0).cmp(&Version::new(2, 6, 1, 1)),
            Ordering::Greater
        );
        assert_eq!(
            Version::new(2, 6, 1, 1).cmp(&Version::new(2, 6, 1, 2)),
            Ordering::Less
        );
        // but a stable of an older triple still loses
        assert!(Version::new(2, 6, 0, 0) < Version::new(2, 6, 1, 1));
    }

    #[test]
    fn test_order_is_reflexive_and_antisymmetric() {
        let a = Version::new(2, 6, 1, 3);
        let b = Version::new(2, 6, 1, 0);
        assert_eq!(a.cmp(&a), Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn test_sort_tags_descending() {
        let tags = vec![
            "v2.6.0-rc1".to_string(),
            "v2.6.0".to_string(),
            "v2.6.0-rc2".to_string(),
        ];
        assert_eq!(
            sort_tags_descending(&tags),
            vec!["v2.6.0", "v2.6.0-rc2", "v2.6.0-rc1"]
        );
    }

    #[test]
    fn test_sort_tags_descending_is_stable_for_ties() {
        let tags = vec![
            "junk-a".to_string(),
            "v1.0.0".to_string(),
            "junk-b".to_string(),
        ];
        assert_eq!(sort_tags_descending(&tags), vec!["v1.0.0", "junk-a", "junk-b"]);
    }

    #[test]
    fn test_latest_version() {
        let tags = vec![
            "v2.5.3".to_string(),
            "v2.6.0-rc2".to_string(),
            "v2.6.0-rc1".to_string(),
        ];
        assert_eq!(latest_version(&tags), Some(Version::new(2, 6, 0, 2)));
        assert_eq!(latest_version(&[]), None);
    }

    #[test]
    fn test_line() {
        assert_eq!(Version::new(2, 6, 4, 1).line(), (2, 6));
    }
}
