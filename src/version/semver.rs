//! Lenient semantic version parsing for container image tags
//!
//! Image tags are rarely strict SemVer. This module accepts the shapes that
//! show up on real registries and normalizes them into [`semver::Version`]
//! while keeping the tag exactly as it was published.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

use crate::version::error::TagParseError;
use crate::version::outlier::MajorVersion;

/// `[v]MAJOR[.MINOR[.PATCH[.EXTRA...]]][-PRERELEASE | ALPHA-PRERELEASE][+BUILD]`
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[vV]?(\d+(?:\.\d+)*)(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)|([A-Za-z][0-9A-Za-z-]*(?:\.[0-9A-Za-z-]+)*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
    )
    .expect("tag pattern is valid")
});

/// A container image tag parsed as a semantic version.
///
/// Numeric segments past the patch (`2.0.0.1`) are kept and compared after
/// the patch, missing segments counting as zero. Tags with equal precedence
/// (`1.0` and `1.0.0`) fall back to their original text so sorting stays
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagVersion {
    version: Version,
    extra: Vec<u64>,
    original: String,
}

impl TagVersion {
    /// The tag as it was published (e.g. `v1.2`, `0.8-alpha4`)
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The normalized semantic version, without segments past the patch
    pub fn version(&self) -> &Version {
        &self.version
    }

    fn cmp_extra(&self, other: &Self) -> Ordering {
        let len = self.extra.len().max(other.extra.len());
        (0..len)
            .map(|i| {
                let left = self.extra.get(i).copied().unwrap_or(0);
                let right = other.extra.get(i).copied().unwrap_or(0);
                left.cmp(&right)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl MajorVersion for TagVersion {
    fn major(&self) -> u64 {
        self.version.major
    }
}

impl Ord for TagVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left, right) = (&self.version, &other.version);
        (left.major, left.minor, left.patch)
            .cmp(&(right.major, right.minor, right.patch))
            .then_with(|| self.cmp_extra(other))
            .then_with(|| left.pre.cmp(&right.pre))
            .then_with(|| left.build.cmp(&right.build))
            .then_with(|| self.original.cmp(&other.original))
    }
}

impl PartialOrd for TagVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for TagVersion {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s)
    }
}

/// Drop leading zeros of numeric pre-release identifiers (`rc.01` -> `rc.1`)
fn normalize_prerelease(pre: &str) -> String {
    pre.split('.')
        .map(|identifier| {
            if identifier.bytes().all(|b| b.is_ascii_digit()) {
                let trimmed = identifier.trim_start_matches('0');
                if trimmed.is_empty() { "0" } else { trimmed }
            } else {
                identifier
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Parse an image tag into a [`TagVersion`], padding partial versions with zeros.
///
/// Examples:
/// - "7" -> 7.0.0
/// - "v1.2" -> 1.2.0
/// - "0.8-alpha4" -> 0.8.0-alpha4
/// - "2.1beta" -> 2.1.0-beta
/// - "2.0.0.1" -> 2.0.0 with extra segment 1
/// - "latest" -> error
pub fn parse_tag(tag: &str) -> Result<TagVersion, TagParseError> {
    if tag.is_empty() {
        return Err(TagParseError::Empty);
    }

    let invalid = || TagParseError::Invalid(tag.to_string());
    let captures = TAG_PATTERN.captures(tag).ok_or_else(invalid)?;

    let segments = captures[1]
        .split('.')
        .map(|segment| segment.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    let segment = |index: usize| segments.get(index).copied().unwrap_or(0);

    let mut version = Version::new(segment(0), segment(1), segment(2));
    if let Some(pre) = captures.get(2).or_else(|| captures.get(3)) {
        version.pre = Prerelease::new(&normalize_prerelease(pre.as_str())).map_err(|_| invalid())?;
    }
    if let Some(build) = captures.get(4) {
        version.build = BuildMetadata::new(build.as_str()).map_err(|_| invalid())?;
    }

    Ok(TagVersion {
        version,
        extra: segments.iter().skip(3).copied().collect(),
        original: tag.to_string(),
    })
}
