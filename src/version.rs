//! EditorConfig format versions

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An EditorConfig format version (`major.minor.patch`).
///
/// Some defaulting rules only apply from a given version on, so callers that
/// emulate an older core can pin the version they target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Latest format version this crate implements.
    pub const CURRENT: Version = Version::new(0, 17, 2);

    /// First version that synthesizes `indent_size=tab` from `indent_style=tab`.
    pub const INDENT_SIZE_TAB: Version = Version::new(0, 10, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version '{0}': expected MAJOR[.MINOR[.PATCH]]")]
pub struct VersionError(String);

impl FromStr for Version {
    type Err = VersionError;

    /// Missing minor and patch components default to zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u32, VersionError> {
            match parts.next() {
                Some(p) => p.parse().map_err(|_| VersionError(s.to_string())),
                None if required => Err(VersionError(s.to_string())),
                None => Ok(0),
            }
        };

        let major = next(true)?;
        let minor = next(false)?;
        let patch = next(false)?;

        if parts.next().is_some() {
            return Err(VersionError(s.to_string()));
        }

        Ok(Version::new(major, minor, patch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        assert_eq!("0.12.1".parse::<Version>(), Ok(Version::new(0, 12, 1)));
    }

    #[test]
    fn test_parse_short_version() {
        assert_eq!("1".parse::<Version>(), Ok(Version::new(1, 0, 0)));
        assert_eq!("0.9".parse::<Version>(), Ok(Version::new(0, 9, 0)));
    }

    #[test]
    fn test_parse_invalid_version() {
        assert!("".parse::<Version>().is_err());
        assert!("a.b".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(0, 9, 0) < Version::INDENT_SIZE_TAB);
        assert!(Version::CURRENT >= Version::INDENT_SIZE_TAB);
    }
}
