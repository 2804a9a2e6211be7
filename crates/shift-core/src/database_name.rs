//! Strongly-typed database identity.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Logical name of a target database, matching a section of the
/// configuration file and the `db_name` column of the ledger.
///
/// Keeps database identities from being mixed up with versions or paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatabaseName(String);

impl DatabaseName {
    /// Create a new `DatabaseName`, panicking in debug builds if the name is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        debug_assert!(is_valid(&s), "DatabaseName must be non-empty without whitespace");
        Self(s)
    }

    /// Try to create a new `DatabaseName`, returning `None` if the name is
    /// empty or contains whitespace.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if is_valid(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_valid(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DatabaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for DatabaseName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DatabaseName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for DatabaseName {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("DatabaseName must be non-empty without whitespace")
    }
}

impl PartialEq<str> for DatabaseName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DatabaseName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "database_name_test.rs"]
mod tests;
