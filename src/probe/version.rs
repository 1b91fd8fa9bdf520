//! Host version parsing.
//!
//! Hosts report their version in two places: the implementation package tag
//! (`v1_16_R3`) and the release string (`1.16.5-R0.1-SNAPSHOT`). Older
//! releases omit the patch (`1.8-R0.1-SNAPSHOT`), newer hosts may drop the tag
//! entirely. Anything outside major version 1 is not understood.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IMPLEMENTATION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v?(\d+)_(\d+)(?:_R(\d+))?$").unwrap());
static RELEASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:[-+_ ].*)?$").unwrap());

/// `minor.patch` of a 1.x release, e.g. `16.5` for 1.16.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExactVersion {
    pub minor: u32,
    pub patch: u32,
}

impl ExactVersion {
    pub const UNKNOWN: ExactVersion = ExactVersion { minor: 0, patch: 0 };

    pub const fn new(minor: u32, patch: u32) -> Self {
        Self { minor, patch }
    }
}

impl PartialOrd for ExactVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.minor, self.patch).cmp(&(other.minor, other.patch))
    }
}

impl fmt::Display for ExactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.minor, self.patch)
    }
}

impl FromStr for ExactVersion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let (minor, patch) = value.split_once('.').unwrap_or((value, "0"));
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid version `{}`", value))?;
        let patch = patch
            .parse()
            .map_err(|_| format!("invalid version `{}`", value))?;
        Ok(Self { minor, patch })
    }
}

impl TryFrom<String> for ExactVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExactVersion> for String {
    fn from(version: ExactVersion) -> Self {
        version.to_string()
    }
}

/// Protocol (minor version) from an implementation tag such as `v1_16_R3`.
pub fn parse_implementation_tag(tag: &str) -> Option<u32> {
    let captures = IMPLEMENTATION_TAG.captures(tag.trim())?;
    if &captures[1] != "1" {
        return None;
    }
    captures[2].parse().ok()
}

/// Exact version from a release string such as `1.16.5-R0.1-SNAPSHOT`.
pub fn parse_release(release: &str) -> Option<ExactVersion> {
    let captures = RELEASE.captures(release.trim())?;
    if &captures[1] != "1" {
        return None;
    }
    let minor = captures[2].parse().ok()?;
    let patch = match captures.get(3) {
        Some(patch) => patch.as_str().parse().ok()?,
        None => 0,
    };
    Some(ExactVersion { minor, patch })
}

/// Version information extracted from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostVersion {
    pub implementation_tag: Option<String>,
    pub protocol: u32,
    pub exact: ExactVersion,
    /// False when neither source could be parsed.
    pub recognized: bool,
}

impl HostVersion {
    /// Combines both sources. The tag wins for the protocol; the release
    /// string supplies the exact version and fills in a missing tag.
    pub fn from_reports(tag: Option<&str>, release: Option<&str>) -> Self {
        let tag_protocol = tag.and_then(parse_implementation_tag);
        let exact = release.and_then(parse_release);
        let protocol = tag_protocol.or(exact.map(|e| e.minor));

        match protocol {
            Some(protocol) => Self {
                implementation_tag: tag.map(str::to_string),
                protocol,
                exact: exact.unwrap_or(ExactVersion::new(protocol, 0)),
                recognized: true,
            },
            None => Self {
                implementation_tag: tag.map(str::to_string),
                protocol: 0,
                exact: ExactVersion::UNKNOWN,
                recognized: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_implementation_tag("v1_16_R3"), Some(16));
        assert_eq!(parse_implementation_tag("v1_8_R1"), Some(8));
        assert_eq!(parse_implementation_tag("1_20"), Some(20));
        assert_eq!(parse_implementation_tag("craftbukkit"), None);
        assert_eq!(parse_implementation_tag("v2_1_R1"), None);
    }

    #[test]
    fn test_parse_release_formats() {
        assert_eq!(parse_release("1.16.5-R0.1-SNAPSHOT"), Some(ExactVersion::new(16, 5)));
        assert_eq!(parse_release("1.8-R0.1-SNAPSHOT"), Some(ExactVersion::new(8, 0)));
        assert_eq!(parse_release("1.12.2"), Some(ExactVersion::new(12, 2)));
        assert_eq!(parse_release(" 1.20.4-R0.1 "), Some(ExactVersion::new(20, 4)));
        assert_eq!(parse_release("26.1"), None);
        assert_eq!(parse_release("unknown"), None);
    }

    #[test]
    fn test_two_digit_patch_is_distinct() {
        let tenth = ExactVersion::new(16, 10);
        let first = ExactVersion::new(16, 1);
        assert_ne!(tenth, first);
        assert!(tenth > first);
        assert_eq!(tenth.to_string(), "16.10");
        assert_eq!("16.10".parse::<ExactVersion>(), Ok(tenth));
        assert_eq!(parse_release("1.16.10"), Some(tenth));
    }

    #[test]
    fn test_exact_version_orders_by_parts() {
        assert!(ExactVersion::new(16, 10) > ExactVersion::new(16, 9));
        assert!(ExactVersion::new(16, 5) >= "16.5".parse::<ExactVersion>().unwrap());
        assert_eq!(ExactVersion::new(12, 2).to_string(), "12.2");
        assert_eq!("17".parse::<ExactVersion>(), Ok(ExactVersion::new(17, 0)));
    }

    #[test]
    fn test_tag_wins_and_release_fills_gaps() {
        let version = HostVersion::from_reports(Some("v1_16_R3"), Some("1.16.5-R0.1-SNAPSHOT"));
        assert_eq!(version.protocol, 16);
        assert_eq!(version.exact, ExactVersion::new(16, 5));

        let tagless = HostVersion::from_reports(None, Some("1.20.6-R0.1-SNAPSHOT"));
        assert_eq!(tagless.protocol, 20);
        assert!(tagless.recognized);

        let unknown = HostVersion::from_reports(Some("weird"), Some("beta"));
        assert!(!unknown.recognized);
        assert_eq!(unknown.protocol, 0);
        assert_eq!(unknown.exact, ExactVersion::UNKNOWN);
    }
}
