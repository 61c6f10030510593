//! Record id type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated record id.
///
/// Ids are assigned by the store on creation and are immutable thereafter.
/// The format is restricted to URL-safe characters so ids can appear in
/// request paths and file names without escaping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Maximum allowed length of a record id.
    const MAX_LEN: usize = 128;

    /// Create a new record id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid record id.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > Self::MAX_LEN {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: format!("exceeds maximum length of {} characters", Self::MAX_LEN),
            }
            .into());
        }

        for c in s.chars() {
            let ok = c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '~' | '-');
            if !ok {
                return Err(InvalidInputError::RecordId {
                    value: s.to_string(),
                    reason: format!("contains invalid character '{}'", c),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_id() {
        let id = RecordId::new("18f3a2c4b1-9d2e").unwrap();
        assert_eq!(id.as_str(), "18f3a2c4b1-9d2e");
    }

    #[test]
    fn invalid_empty() {
        assert!(RecordId::new("").is_err());
    }

    #[test]
    fn invalid_slash() {
        assert!(RecordId::new("a/b").is_err());
    }

    #[test]
    fn invalid_too_long() {
        assert!(RecordId::new("x".repeat(129)).is_err());
    }
}
