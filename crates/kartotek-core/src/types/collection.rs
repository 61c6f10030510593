//! Collection name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated collection name.
///
/// Collections are named groupings of records sharing a schema, e.g.
/// `companies` or `freight-shipments`.
///
/// # Example
///
/// ```
/// use kartotek_core::CollectionName;
///
/// let name = CollectionName::new("companies").unwrap();
/// assert_eq!(name.as_str(), "companies");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Maximum allowed length of a collection name.
    const MAX_LEN: usize = 64;

    /// Create a new collection name from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid collection name.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the collection name string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::CollectionName {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > Self::MAX_LEN {
            return Err(InvalidInputError::CollectionName {
                value: s.to_string(),
                reason: format!("exceeds maximum length of {} characters", Self::MAX_LEN),
            }
            .into());
        }

        let first = s.chars().next().unwrap();
        if !first.is_ascii_lowercase() {
            return Err(InvalidInputError::CollectionName {
                value: s.to_string(),
                reason: "must start with a lowercase letter".to_string(),
            }
            .into());
        }

        for c in s.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '_' {
                return Err(InvalidInputError::CollectionName {
                    value: s.to_string(),
                    reason: format!("contains invalid character '{}'", c),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_name() {
        let name = CollectionName::new("freight-shipments").unwrap();
        assert_eq!(name.as_str(), "freight-shipments");
    }

    #[test]
    fn valid_name_with_underscore() {
        assert!(CollectionName::new("page_content").is_ok());
    }

    #[test]
    fn invalid_empty() {
        assert!(CollectionName::new("").is_err());
    }

    #[test]
    fn invalid_uppercase() {
        assert!(CollectionName::new("Companies").is_err());
    }

    #[test]
    fn invalid_starts_with_digit() {
        assert!(CollectionName::new("1companies").is_err());
    }

    #[test]
    fn invalid_whitespace() {
        assert!(CollectionName::new("my companies").is_err());
    }

    #[test]
    fn invalid_too_long() {
        assert!(CollectionName::new("a".repeat(65)).is_err());
    }
}
