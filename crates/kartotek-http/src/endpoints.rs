//! REST endpoint paths and wire types for the remote document store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kartotek_core::{CollectionName, Record, RecordId};

/// Path for the records of a collection.
pub(crate) fn records_path(collection: &CollectionName) -> String {
    format!("collections/{}/records", collection)
}

/// Path for a single record.
pub(crate) fn record_path(collection: &CollectionName, id: &RecordId) -> String {
    format!("collections/{}/records/{}", collection, id)
}

/// Response from listing the records of a collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListRecordsResponse {
    pub records: Vec<Record>,
}

/// Request body for creating a record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRecordRequest<'a> {
    pub fields: &'a Value,
}

/// Request body for a partial update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRecordRequest<'a> {
    pub fields: &'a Value,
}

/// Error body returned by the store API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}
