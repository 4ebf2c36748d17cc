//! Newtype wrappers for semantic IDs
//!
//! These types provide compile-time type safety to prevent mixing up
//! the different kinds of string identifiers a document carries
//! (style names, embedded ICC profile ids).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// An identifier for a named style in a document's style table.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(Arc<str>);

impl StyleId {
    /// Creates a new StyleId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this style ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StyleId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for StyleId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for StyleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identifier for an ICC profile embedded in a document's profile set.
///
/// Color specs reference profiles by id only; the profile blob itself is
/// owned by the document.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Arc<str>);

impl ProfileId {
    /// Creates a new ProfileId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this profile ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProfileId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ProfileId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
