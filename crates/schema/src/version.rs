use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The version new schema documents are stamped with.
pub const CURRENT_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(1, 2, 0);

/// The oldest version `migrate` will accept as a starting point.
pub const MIN_SUPPORTED_VERSION: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// A `major.minor.patch` schema version.
///
/// Ordering is numeric per component (`1.10.0 > 1.9.0`), which the derived
/// `Ord` provides through field order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SchemaVersion {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidVersion(s.to_string());

        let mut parts = s.split('.');
        let component = |part: Option<&str>| -> Result<u64, SchemaError> {
            let text = part.ok_or_else(invalid)?;
            // `u64::from_str` tolerates a leading '+'; a version component is
            // bare digits only.
            if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(invalid());
            }
            text.parse().map_err(|_| invalid())
        };

        let version = Self {
            major: component(parts.next())?,
            minor: component(parts.next())?,
            patch: component(parts.next())?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.to_string()
    }
}

/// Whether `version` is at or above the minimum supported version.
///
/// There is deliberately no upper bound: a higher-than-current version is
/// still "supported" here, and whether it can be migrated is decided by the
/// step table. Unparseable strings are unsupported.
#[must_use]
pub fn is_version_supported(version: &str) -> bool {
    version
        .parse::<SchemaVersion>()
        .map(|parsed| parsed >= MIN_SUPPORTED_VERSION)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cmp::Ordering;

    fn parse(s: &str) -> SchemaVersion {
        s.parse().unwrap()
    }

    #[test]
    fn compares_numerically_per_component() {
        assert_eq!(parse("1.0.0").cmp(&parse("2.0.0")), Ordering::Less);
        assert_eq!(parse("1.0.1").cmp(&parse("1.0.0")), Ordering::Greater);
        assert_eq!(parse("2.1.3").cmp(&parse("2.1.3")), Ordering::Equal);
        // Not lexicographic.
        assert!(parse("1.10.0") > parse("1.9.0"));
    }

    #[test]
    fn displays_as_dotted_triple() {
        assert_eq!(SchemaVersion::new(1, 2, 0).to_string(), "1.2.0");
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "1", "1.2", "1.2.3.4", "a.b.c", "1.-2.0", "1.+2.0", "1..0", "v1.2.0"] {
            assert!(bad.parse::<SchemaVersion>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn serde_round_trips_as_string() {
        let json = serde_json::to_string(&parse("1.2.0")).unwrap();
        assert_eq!(json, r#""1.2.0""#);
        let back: SchemaVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parse("1.2.0"));
    }

    #[test]
    fn support_floor_is_min_version() {
        assert!(is_version_supported("1.0.0"));
        assert!(is_version_supported("1.2.0"));
        // No upper bound.
        assert!(is_version_supported("99.0.0"));
        assert!(!is_version_supported("0.9.0"));
        assert!(!is_version_supported("not-a-version"));
    }

    #[test]
    fn constants_are_ordered() {
        assert!(MIN_SUPPORTED_VERSION <= CURRENT_SCHEMA_VERSION);
    }
}
