//! Ordinal-prefixed migration versions.
//!
//! A version is written `NNN_suffix`: a zero-padded decimal ordinal, an
//! underscore, and a human-readable suffix (`001_initial`, `002_add_age`).
//! Ordering is by ordinal, never by the textual form, so `10_x` sorts after
//! `9_y` even though it does not lexically.

use crate::error::{CoreError, CoreResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Textual form of the "no predecessor" marker used by the first unit of a
/// chain.
pub const ROOT_SENTINEL: &str = "None";

/// Width used when formatting freshly scaffolded ordinals.
pub const ORDINAL_WIDTH: usize = 3;

/// A parsed migration version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MigrationVersion {
    ordinal: u64,
    raw: String,
}

impl MigrationVersion {
    /// Parse a version string such as `001_initial`.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            version: raw.to_string(),
            reason: reason.to_string(),
        };

        let (prefix, suffix) = raw
            .split_once('_')
            .ok_or_else(|| invalid("expected '<ordinal>_<name>', e.g. '001_initial'"))?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("ordinal prefix must be decimal digits"));
        }
        if suffix.is_empty() {
            return Err(invalid("name after the ordinal must not be empty"));
        }
        let ordinal = prefix
            .parse::<u64>()
            .map_err(|_| invalid("ordinal prefix is out of range"))?;

        Ok(Self {
            ordinal,
            raw: raw.to_string(),
        })
    }

    /// Build the version for a new unit: `{ordinal:03}_{name}`.
    pub fn from_parts(ordinal: u64, name: &str) -> CoreResult<Self> {
        Self::parse(&format!("{:0width$}_{}", ordinal, name, width = ORDINAL_WIDTH))
    }

    /// Numeric ordinal used for ordering.
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Human-readable part after the first underscore.
    pub fn name(&self) -> &str {
        self.raw
            .split_once('_')
            .map(|(_, name)| name)
            .unwrap_or_default()
    }

    /// The full version string as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for MigrationVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal
            .cmp(&other.ordinal)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for MigrationVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for MigrationVersion {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for MigrationVersion {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialEq<str> for MigrationVersion {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for MigrationVersion {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

/// Render a predecessor link, using [`ROOT_SENTINEL`] for the chain root.
pub fn display_previous(previous: Option<&MigrationVersion>) -> String {
    previous
        .map(|v| v.to_string())
        .unwrap_or_else(|| ROOT_SENTINEL.to_string())
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
