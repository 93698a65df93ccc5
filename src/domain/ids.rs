//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for SonarQube identifiers.
//! Each type ensures type safety and provides validation at construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Project key newtype wrapper
///
/// Represents a SonarQube project key (the `componentKeys` query value).
/// Keys commonly contain `:` (organization separators) and occasionally `/`,
/// both of which are disallowed in state file names and sanitized by the
/// watermark store.
///
/// # Examples
///
/// ```
/// use sonarex::domain::ids::ProjectKey;
/// use std::str::FromStr;
///
/// let key = ProjectKey::from_str("my-org:my-project").unwrap();
/// assert_eq!(key.as_str(), "my-org:my-project");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Creates a new ProjectKey from a string
    ///
    /// # Arguments
    ///
    /// * `key` - The project key string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ProjectKey)` if the key is non-empty, `Err` otherwise
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err("Project key cannot be empty".to_string());
        }
        Ok(Self(key))
    }

    /// Returns the project key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
