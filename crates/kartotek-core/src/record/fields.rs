//! Validated record fields type.
//!
//! This module provides [`RecordFields`], a type that guarantees the value
//! is a valid record payload: a JSON object whose values are scalars or
//! one-level-nested objects of scalars.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, InvalidInputError};

/// Validated domain fields of a record.
///
/// This type guarantees that:
/// - The value is a JSON object
/// - Top-level values are scalars, or objects nested one level deep
/// - Nested object values are scalars
///
/// These invariants are enforced at construction and deserialization time,
/// making it impossible to hold a malformed payload.
///
/// # Example
///
/// ```
/// use kartotek_core::RecordFields;
/// use serde_json::json;
///
/// let fields = RecordFields::new(json!({
///     "name": "Acme Freight",
///     "status": "active",
///     "address": { "city": "Rotterdam", "country": "NL" }
/// })).unwrap();
///
/// assert_eq!(fields.get_str("status"), Some("active"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields(Value);

impl RecordFields {
    /// Create new record fields from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The value is not a JSON object
    /// - A top-level value is an array or an object nested deeper than one level
    pub fn new(value: Value) -> Result<Self, Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Create an empty set of fields.
    ///
    /// Useful as the neutral partial in update calls: merging it changes
    /// nothing.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    /// Returns true if no fields are present.
    pub fn is_empty(&self) -> bool {
        // Safe: validated as an object at construction
        self.0.as_object().unwrap().is_empty()
    }

    /// Get a field value by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a field as a string slice, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// Get a reference to the inner JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume and return the inner JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Iterate over the field names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        // Safe: validated as an object at construction
        self.0.as_object().unwrap().keys().map(|k| k.as_str())
    }

    /// Merge a partial set of fields into this one, returning the result.
    ///
    /// Keys present in `partial` replace the existing values; keys absent
    /// from `partial` persist unchanged. Merging an empty partial returns
    /// the fields as-is.
    pub fn merged(&self, partial: &RecordFields) -> Self {
        let mut merged = self.0.as_object().unwrap().clone();
        for (key, value) in partial.0.as_object().unwrap() {
            merged.insert(key.clone(), value.clone());
        }
        Self(Value::Object(merged))
    }

    fn validate(value: &Value) -> Result<(), Error> {
        let obj = value.as_object().ok_or_else(|| {
            Error::InvalidInput(InvalidInputError::Fields {
                reason: "record fields must be a JSON object".to_string(),
            })
        })?;

        for (key, value) in obj {
            match value {
                Value::Object(nested) => {
                    for (nested_key, nested_value) in nested {
                        if nested_value.is_object() || nested_value.is_array() {
                            return Err(Error::InvalidInput(InvalidInputError::Fields {
                                reason: format!(
                                    "field '{}.{}' nests deeper than one level",
                                    key, nested_key
                                ),
                            }));
                        }
                    }
                }
                Value::Array(_) => {
                    return Err(Error::InvalidInput(InvalidInputError::Fields {
                        reason: format!("field '{}' must not be an array", key),
                    }));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl Serialize for RecordFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RecordFields::new(value).map_err(serde::de::Error::custom)
    }
}
