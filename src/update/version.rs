//! Version strings of the form `MAJOR.MINOR.PATCH[-TYPE]`.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Release channel carried by a version suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// No suffix.
    Stable,
    /// `-beta`.
    Beta,
    /// `-alpha`.
    Alpha,
    /// `-dev`.
    Dev,
    /// The string could not be parsed.
    Unknown,
}

impl ReleaseType {
    /// Lower-case name, as used in version suffixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
            Self::Dev => "dev",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed version.
///
/// Ordering looks at the numeric core only, so `1.2.0-beta` is neither newer nor
/// older than `1.2.0`. Equality additionally requires the same release type.
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Release channel.
    pub release_type: ReleaseType,
    /// The string as supplied.
    pub raw: String,
}

impl PartialEq for VersionInfo {
    fn eq(&self, other: &Self) -> bool {
        self.core() == other.core() && self.release_type == other.release_type
    }
}

impl Eq for VersionInfo {}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

const SUFFIXES: [(&str, ReleaseType); 3] = [
    ("dev", ReleaseType::Dev),
    ("beta", ReleaseType::Beta),
    ("alpha", ReleaseType::Alpha),
];

impl VersionInfo {
    /// What: Parse a version string.
    ///
    /// Inputs:
    /// - `raw`: Text such as `1.7.2-alpha`, `2.0.0` or `1.5.1_beta`
    ///
    /// Output:
    /// - `Some(info)` when the text starts with `MAJOR.MINOR.PATCH`; `None` otherwise
    ///
    /// Details:
    /// - Matching is case-insensitive and anchored at the start only; trailing
    ///   text after a recognised prefix is ignored.
    /// - The suffix may follow the core directly or after one `-` or `_`.
    #[must_use]
    pub fn try_parse(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        let (major, rest) = leading_number(&lower)?;
        let (minor, rest) = leading_number(rest.strip_prefix('.')?)?;
        let (patch, rest) = leading_number(rest.strip_prefix('.')?)?;

        let suffix = rest
            .strip_prefix(['-', '_'])
            .filter(|after| SUFFIXES.iter().any(|(name, _)| after.starts_with(name)))
            .unwrap_or(rest);
        let release_type = SUFFIXES
            .iter()
            .find(|(name, _)| suffix.starts_with(name))
            .map_or(ReleaseType::Stable, |(_, kind)| *kind);

        Some(Self {
            major,
            minor,
            patch,
            release_type,
            raw: raw.to_string(),
        })
    }

    /// What: Parse a version string, falling back to `0.0.0` (unknown) on failure.
    #[must_use]
    pub fn parse_or_unknown(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_else(|| Self {
            major: 0,
            minor: 0,
            patch: 0,
            release_type: ReleaseType::Unknown,
            raw: raw.to_string(),
        })
    }

    /// Numeric core without the release type.
    #[must_use]
    pub const fn core(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Compare numeric cores.
    #[must_use]
    pub fn cmp_core(&self, other: &Self) -> Ordering {
        self.core().cmp(&other.core())
    }

    /// True for releases without a suffix.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.release_type == ReleaseType::Stable
    }

    /// True for alpha, beta and dev builds.
    #[must_use]
    pub const fn is_prerelease(&self) -> bool {
        matches!(
            self.release_type,
            ReleaseType::Alpha | ReleaseType::Beta | ReleaseType::Dev
        )
    }
}

fn leading_number(text: &str) -> Option<(u64, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> VersionInfo {
        VersionInfo::try_parse(raw).expect("version should parse")
    }

    #[test]
    /// What: Suffixes are recognised with `-`, `_` or no separator, in any case.
    fn parses_release_types() {
        assert_eq!(parse("1.7.2-alpha").release_type, ReleaseType::Alpha);
        assert_eq!(parse("1.5.1_BETA").release_type, ReleaseType::Beta);
        assert_eq!(parse("2.0.0dev").release_type, ReleaseType::Dev);
        assert_eq!(parse("2.0.0").release_type, ReleaseType::Stable);
        assert_eq!(parse("2.0.0-rc1").release_type, ReleaseType::Stable);
        assert_eq!(parse("1.7.2-alpha").core(), (1, 7, 2));
        assert_eq!(parse("1.7.2-Alpha").raw, "1.7.2-Alpha");
    }

    #[test]
    /// What: Text that does not start with a numeric core is rejected.
    ///
    /// Output:
    /// - `try_parse` returns `None`; `parse_or_unknown` yields `0.0.0` unknown keeping the raw text.
    fn rejects_invalid_versions() {
        for raw in ["v1.2.3", "1.2", "abc", "", "1..2"] {
            assert!(VersionInfo::try_parse(raw).is_none(), "{raw}");
        }
        let unknown = VersionInfo::parse_or_unknown("latest");
        assert_eq!(unknown.core(), (0, 0, 0));
        assert_eq!(unknown.release_type, ReleaseType::Unknown);
        assert_eq!(unknown.to_string(), "latest");
    }

    #[test]
    /// What: Ordering compares the core only; equality also needs the release type.
    fn comparison_rules() {
        assert_eq!(parse("1.2.0").cmp_core(&parse("1.10.0")), Ordering::Less);
        assert_eq!(parse("2.0.0").cmp_core(&parse("1.99.99")), Ordering::Greater);
        assert_eq!(parse("1.2.0-beta").cmp_core(&parse("1.2.0")), Ordering::Equal);
        assert_ne!(parse("1.2.0-beta"), parse("1.2.0"));
        assert_eq!(parse("1.2.0"), parse("1.2.0-RC"));
        assert!(parse("1.2.0-dev").is_prerelease());
        assert!(parse("1.2.0").is_stable());
    }
}
