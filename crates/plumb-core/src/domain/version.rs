//! Version comparison helpers.
//!
//! Pure functions for cleaning, parsing and classifying version strings.
//! Every place that needs a major version goes through
//! [`extract_major_version`] so the prefix-stripping rules stay in one spot.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::value_objects::{ComparisonMode, UpdateType};

/// Comparator prefixes accepted in front of a version, longest first.
pub const COMPARATOR_PREFIXES: [&str; 7] = [">=", "<=", ">", "<", "~", "^", "="];

static VERSION_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(>=|>|<=|<|~|\^|=)?\s*v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$",
    )
    .expect("version range pattern is valid")
});

static SHORT_VERSION_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(>=|>|<=|<|~|\^|=)?\s*v?(0|[1-9]\d*)\.(0|[1-9]\d*)(\.(0|[1-9]\d*))?$")
        .expect("short version pattern is valid")
});

/// A parsed `MAJOR.MINOR.PATCH[-pre][+build]` version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
    pub build: Option<String>,
}

impl SemVer {
    /// Parse a version, tolerating comparator prefixes, a leading `v` and
    /// missing minor/patch components (`"1.22"` parses as `1.22.0`).
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let cleaned = clean_version(input);
        if cleaned.is_empty() {
            return Err(parse_error(input, "empty version"));
        }

        let (core, build) = match cleaned.split_once('+') {
            Some((core, build)) => (core, Some(build.to_string())),
            None => (cleaned, None),
        };
        let (core, pre) = match core.split_once('-') {
            Some((core, pre)) => (core, Some(pre.to_string())),
            None => (core, None),
        };

        let mut parts = core.split('.');
        let major = parse_component(input, parts.next())?;
        let minor = match parts.next() {
            Some(p) => parse_component(input, Some(p))?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => parse_component(input, Some(p))?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(parse_error(input, "too many components"));
        }

        Ok(Self {
            major,
            minor,
            patch,
            pre,
            build,
        })
    }
}

impl PartialOrd for SemVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemVer {
    /// Build metadata is ignored; a pre-release sorts before its release.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

/// Strip whitespace, one comparator prefix and a leading `v`.
pub fn clean_version(input: &str) -> &str {
    let mut s = input.trim();
    for prefix in COMPARATOR_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }
    s.strip_prefix('v').unwrap_or(s)
}

/// Major version of a (possibly prefixed) version string.
///
/// `extract_major_version(">=5.2.1") == extract_major_version("5.2.1") == 5`.
pub fn extract_major_version(input: &str) -> Result<u64, DomainError> {
    let cleaned = clean_version(input);
    if cleaned.is_empty() {
        return Err(parse_error(input, "empty version"));
    }
    let first = cleaned.split('.').next().unwrap_or_default();
    first
        .parse::<u64>()
        .map_err(|_| parse_error(input, "leading segment is not numeric"))
}

/// Minor version, defaulting to 0 when absent.
pub fn extract_minor_version(input: &str) -> Result<u64, DomainError> {
    SemVer::parse(input).map(|v| v.minor)
}

/// `[op]MAJOR.MINOR.PATCH[-pre][+build]`.
pub fn is_valid_version_range(input: &str) -> bool {
    VERSION_RANGE.is_match(input.trim())
}

/// Like [`is_valid_version_range`] but also accepts `MAJOR.MINOR`.
pub fn is_valid_short_version_range(input: &str) -> bool {
    is_valid_version_range(input) || SHORT_VERSION_RANGE.is_match(input.trim())
}

/// Semantic ordering of two versions, `None` when either fails to parse.
pub fn compare_semantic(a: &str, b: &str) -> Option<Ordering> {
    let a = SemVer::parse(a).ok()?;
    let b = SemVer::parse(b).ok()?;
    Some(a.cmp(&b))
}

/// Semantic comparison with a lexicographic fallback on cleaned strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    compare_semantic(a, b).unwrap_or_else(|| clean_version(a).cmp(clean_version(b)))
}

/// Whether `current` is older than `latest` under `mode`.
pub fn is_older_than(current: &str, latest: &str, mode: ComparisonMode) -> bool {
    match mode {
        ComparisonMode::Lexicographic => clean_version(current) < clean_version(latest),
        ComparisonMode::Semantic => compare_versions(current, latest) == Ordering::Less,
    }
}

/// Whether moving from `current` to `latest` crosses a major version.
///
/// Unparseable input is treated as breaking.
pub fn is_breaking(current: &str, latest: &str) -> bool {
    match (extract_major_version(current), extract_major_version(latest)) {
        (Ok(a), Ok(b)) => a != b,
        _ => true,
    }
}

pub fn update_type(current: &str, latest: &str) -> UpdateType {
    if is_breaking(current, latest) {
        UpdateType::Major
    } else {
        UpdateType::Minor
    }
}

/// Even majors are long-term-support releases.
pub const fn is_lts_major(major: u64) -> bool {
    major % 2 == 0
}

/// Nearest LTS major at or below `major`, never below `floor`.
pub fn nearest_lts_major(major: u64, floor: u64) -> u64 {
    let candidate = if is_lts_major(major) {
        major
    } else {
        major.saturating_sub(1)
    };
    candidate.max(floor)
}

fn parse_component(input: &str, part: Option<&str>) -> Result<u64, DomainError> {
    let part = part.ok_or_else(|| parse_error(input, "missing component"))?;
    part.parse::<u64>()
        .map_err(|_| parse_error(input, "component is not numeric"))
}

fn parse_error(input: &str, reason: &str) -> DomainError {
    DomainError::VersionParse {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_extraction_ignores_prefix() {
        assert_eq!(extract_major_version(">=5.2.1").unwrap(), 5);
        assert_eq!(extract_major_version("5.2.1").unwrap(), 5);
        for prefix in COMPARATOR_PREFIXES {
            let input = format!("{prefix}20.17.0");
            assert_eq!(extract_major_version(&input).unwrap(), 20, "{input}");
        }
    }

    #[test]
    fn major_extraction_rejects_empty_and_non_numeric() {
        assert!(extract_major_version("").is_err());
        assert!(extract_major_version("   ").is_err());
        assert!(extract_major_version(">=").is_err());
        assert!(extract_major_version("latest").is_err());
        assert!(extract_major_version("x.1.0").is_err());
    }

    #[test]
    fn clean_version_strips_one_prefix_and_v() {
        assert_eq!(clean_version("^1.2.3"), "1.2.3");
        assert_eq!(clean_version(" >= 1.2.3 "), "1.2.3");
        assert_eq!(clean_version("v1.9.1"), "1.9.1");
    }

    #[test]
    fn range_grammar() {
        assert!(is_valid_version_range(">=20.0.0"));
        assert!(is_valid_version_range("^20.17.0"));
        assert!(is_valid_version_range("1.0.0-beta.1+build.5"));
        assert!(!is_valid_version_range("20"));
        assert!(!is_valid_version_range("20.x"));
        assert!(!is_valid_version_range("=>1.0.0"));
        assert!(is_valid_short_version_range("1.22"));
        assert!(!is_valid_short_version_range("1"));
    }

    #[test]
    fn every_stripped_prefix_passes_the_format_check() {
        for prefix in COMPARATOR_PREFIXES {
            assert!(is_valid_version_range(&format!("{prefix}1.0.0")), "{prefix}");
            assert!(is_valid_short_version_range(&format!("{prefix}1.22")), "{prefix}");
        }
        assert_eq!(extract_major_version("=1.0.0").unwrap(), 1);
        assert!(!is_valid_version_range("==1.0.0"));
    }

    #[test]
    fn semver_parses_short_forms() {
        let v = SemVer::parse("1.22").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 22, 0));
        assert!(SemVer::parse("1.2.3.4").is_err());
    }

    #[test]
    fn prerelease_sorts_before_release() {
        assert_eq!(
            compare_semantic("1.0.0-rc.1", "1.0.0"),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn lexicographic_mode_misorders_double_digit_majors() {
        assert!(!is_older_than("9.0.0", "10.0.0", ComparisonMode::Lexicographic));
        assert!(is_older_than("9.0.0", "10.0.0", ComparisonMode::Semantic));
    }

    #[test]
    fn both_modes_agree_on_simple_cases() {
        for mode in [ComparisonMode::Lexicographic, ComparisonMode::Semantic] {
            assert!(is_older_than("4.17.15", "4.17.21", mode));
            assert!(!is_older_than("4.17.21", "4.17.21", mode));
        }
    }

    #[test]
    fn breaking_means_major_differs() {
        assert!(is_breaking("^4.0.0", "5.0.0"));
        assert!(!is_breaking("~4.1.0", "4.9.0"));
        assert_eq!(update_type("4.1.0", "4.9.0"), UpdateType::Minor);
    }

    #[test]
    fn lts_floor_is_respected() {
        assert_eq!(nearest_lts_major(21, 18), 20);
        assert_eq!(nearest_lts_major(17, 18), 18);
        assert_eq!(nearest_lts_major(22, 18), 22);
    }
}
