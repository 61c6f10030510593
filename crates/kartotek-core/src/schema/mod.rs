//! Per-collection schemas.
//!
//! Each collection declares which fields are required on create, which
//! string fields free-text search runs over, and which fields back the
//! structured filters. Validation happens once at the store boundary
//! instead of ad hoc per screen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, StoreError};
use crate::filter::FilterState;
use crate::record::RecordFields;
use crate::types::CollectionName;

/// Schema for a single collection.
///
/// # Example
///
/// ```
/// use kartotek_core::{CollectionName, CollectionSchema};
///
/// let schema = CollectionSchema::new(CollectionName::new("companies").unwrap())
///     .require("name")
///     .search_over(["name", "email", "phone"])
///     .status_in("status")
///     .category_in("industry")
///     .date_in("createdDate");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    /// The collection this schema describes.
    pub name: CollectionName,

    /// Field names that must be present and non-null on create.
    #[serde(default)]
    pub required_fields: Vec<String>,

    /// String fields matched by free-text search.
    #[serde(default)]
    pub search_fields: Vec<String>,

    /// Field backing the `status` filter, if the collection has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_field: Option<String>,

    /// Field backing the `category` filter, if the collection has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_field: Option<String>,

    /// Field holding the record's reference date (RFC 3339 string) for
    /// date-range filters, if the collection has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_field: Option<String>,
}

impl CollectionSchema {
    /// Create a schema with no required fields and no filterable keys.
    pub fn new(name: CollectionName) -> Self {
        Self {
            name,
            required_fields: Vec::new(),
            search_fields: Vec::new(),
            status_field: None,
            category_field: None,
            date_field: None,
        }
    }

    /// Mark a field as required on create.
    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required_fields.push(field.into());
        self
    }

    /// Set the fields free-text search matches against.
    pub fn search_over<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the field backing the `status` filter.
    pub fn status_in(mut self, field: impl Into<String>) -> Self {
        self.status_field = Some(field.into());
        self
    }

    /// Set the field backing the `category` filter.
    pub fn category_in(mut self, field: impl Into<String>) -> Self {
        self.category_field = Some(field.into());
        self
    }

    /// Set the field holding the record's reference date.
    pub fn date_in(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }

    /// Validate a full set of fields for create.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] naming every required field that
    /// is absent or null.
    pub fn validate_fields(&self, fields: &RecordFields) -> Result<(), Error> {
        let missing: Vec<String> = self
            .required_fields
            .iter()
            .filter(|name| {
                fields
                    .get(name.as_str())
                    .map(|v| v.is_null())
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation {
                collection: self.name.to_string(),
                missing,
            }
            .into())
        }
    }

    /// Validate that a filter only constrains keys this schema backs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] for the first unsupported key.
    pub fn validate_filter(&self, filter: &FilterState) -> Result<(), Error> {
        let unsupported = |key: &str| {
            Err(StoreError::InvalidQuery {
                message: format!(
                    "collection '{}' does not support the '{}' filter",
                    self.name, key
                ),
            }
            .into())
        };

        if filter.search().is_some() && self.search_fields.is_empty() {
            return unsupported("search");
        }
        if filter.status().is_some() && self.status_field.is_none() {
            return unsupported("status");
        }
        if filter.category().is_some() && self.category_field.is_none() {
            return unsupported("category");
        }
        if (filter.start_date().is_some() || filter.end_date().is_some())
            && self.date_field.is_none()
        {
            return unsupported("date range");
        }

        Ok(())
    }
}

/// A named set of collection schemas.
///
/// Stores look collections up here before touching records; an unknown
/// collection is an invalid query, not a silent empty result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    schemas: BTreeMap<CollectionName, CollectionSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema, replacing any previous schema for the same collection.
    pub fn register(mut self, schema: CollectionSchema) -> Self {
        self.schemas.insert(schema.name.clone(), schema);
        self
    }

    /// Look up the schema for a collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] for an unknown collection.
    pub fn get(&self, collection: &CollectionName) -> Result<&CollectionSchema, Error> {
        self.schemas.get(collection).ok_or_else(|| {
            StoreError::InvalidQuery {
                message: format!("unknown collection '{}'", collection),
            }
            .into()
        })
    }

    /// Returns true if the registry has a schema for the collection.
    pub fn contains(&self, collection: &CollectionName) -> bool {
        self.schemas.contains_key(collection)
    }

    /// Iterate over the registered schemas in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.schemas.values()
    }

    /// Number of registered collections.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no collections are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn companies() -> CollectionSchema {
        CollectionSchema::new(CollectionName::new("companies").unwrap())
            .require("name")
            .search_over(["name", "email"])
            .status_in("status")
            .date_in("createdDate")
    }

    #[test]
    fn validate_fields_accepts_complete_record() {
        let fields = RecordFields::new(json!({ "name": "Acme", "status": "active" })).unwrap();
        assert!(companies().validate_fields(&fields).is_ok());
    }

    #[test]
    fn validate_fields_rejects_missing_required() {
        let fields = RecordFields::new(json!({ "status": "active" })).unwrap();
        let err = companies().validate_fields(&fields).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn validate_fields_rejects_null_required() {
        let fields = RecordFields::new(json!({ "name": null })).unwrap();
        assert!(companies().validate_fields(&fields).is_err());
    }

    #[test]
    fn validate_filter_rejects_unbacked_category() {
        let filter = FilterState::default().with_category("logistics");
        let err = companies().validate_filter(&filter).unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn validate_filter_accepts_backed_keys() {
        let filter = FilterState::default()
            .with_search("acme")
            .with_status("active");
        assert!(companies().validate_filter(&filter).is_ok());
    }

    #[test]
    fn registry_lookup_unknown_collection() {
        let registry = SchemaRegistry::new().register(companies());
        let missing = CollectionName::new("invoices").unwrap();
        assert!(registry.get(&missing).is_err());

        let known = CollectionName::new("companies").unwrap();
        assert!(registry.get(&known).is_ok());
    }

    #[test]
    fn registry_serde_roundtrip() {
        let registry = SchemaRegistry::new().register(companies());
        let json = serde_json::to_string(&registry).unwrap();
        let back: SchemaRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert!(back.contains(&CollectionName::new("companies").unwrap()));
    }
}
