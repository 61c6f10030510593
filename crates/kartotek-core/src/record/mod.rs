//! Record types.
//!
//! A [`Record`] is a single persisted entity: a store-assigned id,
//! store-assigned timestamps, and a validated set of domain fields.

mod fields;

pub use fields::RecordFields;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// A record from a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The store-assigned id of this record. Immutable after creation.
    pub id: RecordId,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated. Equal to `created_at` until the
    /// first update.
    pub updated_at: DateTime<Utc>,

    /// The record's domain fields.
    pub fields: RecordFields,
}

impl Record {
    /// Get a domain field value by name.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Get a domain field as a string slice, if it is a string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get_str(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serde_roundtrip_uses_camel_case() {
        let record = Record {
            id: RecordId::new("abc123").unwrap(),
            created_at: "2024-03-01T10:00:00Z".parse().unwrap(),
            updated_at: "2024-03-02T11:30:00Z".parse().unwrap(),
            fields: RecordFields::new(json!({ "name": "Acme Freight" })).unwrap(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());

        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
