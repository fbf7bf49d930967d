//! Plugin version comparison
//!
//! Version strings in update-center documents are loosely structured: a dotted
//! numeric version optionally annotated with parenthetical qualifiers, e.g.
//! `"1.2.3 (beta)"`. Qualifiers are discarded before comparison.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, UpdateSiteError};

static QUALIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)").expect("qualifier pattern is valid"));

/// Remove every parenthetical group and trim surrounding whitespace.
pub fn strip_qualifiers(version: &str) -> String {
    QUALIFIER_RE.replace_all(version, "").trim().to_string()
}

/// Returns true iff `candidate` is strictly newer than `baseline`.
///
/// Both strings are qualifier-stripped first. An empty result is the zero
/// version; any other string that is not dotted numeric is an error.
pub fn is_newer(candidate: &str, baseline: &str) -> Result<bool> {
    let candidate = VersionNumber::parse(&strip_qualifiers(candidate))?;
    let baseline = VersionNumber::parse(&strip_qualifiers(baseline))?;
    Ok(candidate > baseline)
}

/// Dotted numeric version, compared segment by segment.
///
/// Missing trailing segments count as zero, so `1.0` and `1.0.0` are equal.
#[derive(Debug, Clone, Default)]
pub struct VersionNumber {
    segments: Vec<u64>,
}

impl VersionNumber {
    /// Parse a cleaned version string. Whitespace is trimmed; the empty
    /// string yields the zero version.
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let segments = trimmed
            .split('.')
            .map(|segment| parse_segment(trimmed, segment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// True for the empty version and for any all-zero version.
    pub fn is_zero(&self) -> bool {
        self.segments.iter().all(|s| *s == 0)
    }

    fn significant(&self) -> &[u64] {
        let len = self
            .segments
            .iter()
            .rposition(|s| *s != 0)
            .map_or(0, |i| i + 1);
        &self.segments[..len]
    }
}

fn parse_segment(version: &str, segment: &str) -> Result<u64> {
    if segment.is_empty() {
        return Err(UpdateSiteError::VersionParse {
            version: version.to_string(),
            message: "empty segment".to_string(),
        });
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UpdateSiteError::VersionParse {
            version: version.to_string(),
            message: format!("non-numeric segment '{}'", segment),
        });
    }
    segment
        .parse::<u64>()
        .map_err(|e| UpdateSiteError::VersionParse {
            version: version.to_string(),
            message: format!("segment '{}': {}", segment, e),
        })
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for VersionNumber {}

impl FromStr for VersionNumber {
    type Err = UpdateSiteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "0");
        }
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionNumber {
        VersionNumber::parse(s).unwrap()
    }

    #[test]
    fn test_strip_qualifiers() {
        assert_eq!(strip_qualifiers("1.2 (beta)"), "1.2");
        assert_eq!(strip_qualifiers("  1.2  "), "1.2");
        assert_eq!(strip_qualifiers("1(a).2(b)"), "1.2");
        assert_eq!(strip_qualifiers("(only)"), "");
    }

    #[test]
    fn test_strip_qualifiers_idempotent() {
        let once = strip_qualifiers("2.0 (rc) (internal)");
        assert_eq!(strip_qualifiers(&once), once);
    }

    #[test]
    fn test_numeric_not_lexical() {
        assert!(is_newer("1.10", "1.9").unwrap());
        assert!(!is_newer("1.9", "1.10").unwrap());
    }

    #[test]
    fn test_is_newer_irreflexive() {
        for s in ["1.0", "2.3.4", "", "1.0 (old)", "10.0.1"] {
            assert!(!is_newer(s, s).unwrap(), "{} should not be newer than itself", s);
        }
    }

    #[test]
    fn test_is_newer_with_qualifiers() {
        assert!(is_newer("1.2 (beta)", "1.1").unwrap());
        assert!(is_newer("1.2", "1.1").unwrap());
        assert!(is_newer("1(a).2(b)", "1.1").unwrap());
        assert!(!is_newer("1.0", "1.0 (old)").unwrap());
    }

    #[test]
    fn test_trailing_zero_segments() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert!(v("1.0") < v("1.0.1"));
        assert!(is_newer("1.0.1", "1.0").unwrap());
        assert!(!is_newer("1.0.0", "1").unwrap());
    }

    #[test]
    fn test_empty_is_lowest() {
        assert!(v("").is_zero());
        assert_eq!(v(""), v("0.0"));
        assert!(!is_newer("", "1.0").unwrap());
        assert!(is_newer("1.0", "").unwrap());
        assert!(!is_newer("(only)", "").unwrap());
    }

    #[test]
    fn test_malformed_version_is_error() {
        let err = is_newer("1.x", "1.0").unwrap_err();
        assert!(matches!(err, UpdateSiteError::VersionParse { .. }));

        assert!(VersionNumber::parse("1..2").is_err());
        assert!(VersionNumber::parse("1.0-SNAPSHOT").is_err());
        assert!(VersionNumber::parse("99999999999999999999999").is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        let parsed: VersionNumber = "1.20.3".parse().unwrap();
        assert_eq!(parsed.to_string(), "1.20.3");
        assert_eq!(parsed.segments(), &[1, 20, 3]);
        assert_eq!(VersionNumber::default().to_string(), "0");
    }
}
