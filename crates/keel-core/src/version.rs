//! # API Version Value Type
//!
//! [`ApiVersion`] identifies one published revision of the API surface.
//! Versions order naturally (`1.0.0 < 1.1.0 < 2.0.0`), render as
//! `major.minor.patch`, and group OpenAPI documents under the canonical
//! `v<major>.<minor>.<patch>` name.
//!
//! ## Parsing
//!
//! Clients are allowed to be terse: `2`, `2.1`, `2.1.0`, `v2`, and `V2.1` all
//! parse. Omitted components default to zero. Anything else is rejected with
//! [`VersionError::Malformed`] carrying the offending input, so the API layer
//! can surface it back to the caller verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a version indicator cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The input is not of the form `[v]major[.minor[.patch]]`.
    #[error("malformed API version: '{0}'")]
    Malformed(String),
}

/// A three-component API version.
///
/// Ordering is lexicographic over `(major, minor, patch)`, which is what the
/// documentation UI relies on to list versions newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl ApiVersion {
    /// The version assumed when a client specifies none: `1.0.0`.
    pub const DEFAULT: Self = Self { major: 1, minor: 0, patch: 0 };

    /// Create a version with a zero patch component.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor, patch: 0 }
    }

    /// Replace the patch component.
    pub const fn with_patch(self, patch: u16) -> Self {
        Self { patch, ..self }
    }

    /// The OpenAPI document group name: `v<major>.<minor>.<patch>`.
    pub fn group_name(&self) -> String {
        format!("v{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// Whether `other` is a shorthand for this version: equal on every
    /// component the client actually supplied.
    ///
    /// `v2` matches the registered `2.1.0` only when compared through the
    /// registry; exact equality is used there. This helper exists for the
    /// negotiation layer, which first parses the shorthand with zero-filled
    /// components and then looks for a registered version sharing the major
    /// (and, when given, minor) component.
    pub fn matches_prefix(&self, major: u16, minor: Option<u16>) -> bool {
        self.major == major && minor.map_or(true, |m| self.minor == m)
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ApiVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || VersionError::Malformed(s.to_string());

        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(malformed());
        }

        let mut parts = digits.split('.');
        let mut component = |required: bool| -> Result<Option<u16>, VersionError> {
            match parts.next() {
                None if required => Err(malformed()),
                None => Ok(None),
                Some(p) => p
                    .parse::<u16>()
                    .map(Some)
                    .map_err(|_| malformed()),
            }
        };

        let major = component(true)?.ok_or_else(malformed)?;
        let minor = component(false)?.unwrap_or(0);
        let patch = component(false)?.unwrap_or(0);
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self { major, minor, patch })
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_zero_zero() {
        assert_eq!(ApiVersion::DEFAULT, ApiVersion { major: 1, minor: 0, patch: 0 });
    }

    #[test]
    fn parses_full_form() {
        let v: ApiVersion = "2.1.3".parse().unwrap();
        assert_eq!(v, ApiVersion::new(2, 1).with_patch(3));
    }

    #[test]
    fn parses_short_forms() {
        assert_eq!("2".parse::<ApiVersion>().unwrap(), ApiVersion::new(2, 0));
        assert_eq!("2.1".parse::<ApiVersion>().unwrap(), ApiVersion::new(2, 1));
    }

    #[test]
    fn parses_v_prefix() {
        assert_eq!("v2.1".parse::<ApiVersion>().unwrap(), ApiVersion::new(2, 1));
        assert_eq!("V3".parse::<ApiVersion>().unwrap(), ApiVersion::new(3, 0));
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "v", "two", "1.x", "1.2.3.4", "1..2", "-1", "v1.2-beta"] {
            let err = input.parse::<ApiVersion>().unwrap_err();
            assert_eq!(err, VersionError::Malformed(input.to_string()), "input: {input:?}");
        }
    }

    #[test]
    fn group_name_format() {
        assert_eq!(ApiVersion::new(1, 0).group_name(), "v1.0.0");
        assert_eq!(ApiVersion::new(2, 1).with_patch(7).group_name(), "v2.1.7");
    }

    #[test]
    fn ordering_is_newest_last() {
        let mut versions = vec![
            ApiVersion::new(2, 0),
            ApiVersion::new(1, 0),
            ApiVersion::new(1, 1),
        ];
        versions.sort();
        assert_eq!(
            versions,
            vec![ApiVersion::new(1, 0), ApiVersion::new(1, 1), ApiVersion::new(2, 0)]
        );
    }

    #[test]
    fn prefix_match() {
        let v = ApiVersion::new(2, 1);
        assert!(v.matches_prefix(2, None));
        assert!(v.matches_prefix(2, Some(1)));
        assert!(!v.matches_prefix(2, Some(0)));
        assert!(!v.matches_prefix(3, None));
    }

    #[test]
    fn serde_round_trips_as_string() {
        let v = ApiVersion::new(2, 1).with_patch(4);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"2.1.4\"");
        let back: ApiVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn deserialize_rejects_malformed() {
        let err = serde_json::from_str::<ApiVersion>("\"nope\"").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
