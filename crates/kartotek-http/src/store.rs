//! HTTP-backed record store.

use async_trait::async_trait;
use tracing::{debug, instrument};

use kartotek_core::error::{Error, StoreError, TransportError};
use kartotek_core::traits::RecordStore;
use kartotek_core::{
    CollectionName, FilterState, Record, RecordFields, RecordId, Result, StoreUrl,
};

use crate::client::{ApiError, ApiFailure, HttpClient};
use crate::endpoints::*;
use crate::retry::RetryPolicy;

/// A network-backed record store speaking the document store's REST API.
///
/// Transient transport failures are retried under the configured
/// [`RetryPolicy`]; all other failures propagate immediately.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base: StoreUrl,
    client: HttpClient,
    retry: RetryPolicy,
}

impl RemoteStore {
    /// Create a store client for the given base URL.
    pub fn new(base: StoreUrl) -> Self {
        let client = HttpClient::new(base.clone(), None);
        Self {
            base,
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Create a store client authenticating with a bearer token.
    pub fn with_token(base: StoreUrl, token: impl Into<String>) -> Self {
        let client = HttpClient::new(base.clone(), Some(token.into()));
        Self {
            base,
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the store URL for this instance.
    pub fn url(&self) -> &StoreUrl {
        &self.base
    }

    /// Map an API failure onto the store error taxonomy, with the request
    /// context the response body may lack.
    fn map_failure(
        failure: ApiFailure,
        collection: &CollectionName,
        id: Option<&RecordId>,
    ) -> Error {
        match failure {
            ApiFailure::Error(e) => e,
            ApiFailure::Api(api) => Self::map_api_error(api, collection, id),
        }
    }

    fn map_api_error(api: ApiError, collection: &CollectionName, id: Option<&RecordId>) -> Error {
        match (api.status, api.code.as_deref()) {
            (404, _) | (_, Some("NotFound")) => StoreError::NotFound {
                collection: collection.to_string(),
                id: id.map(|i| i.to_string()).unwrap_or_default(),
            }
            .into(),

            (422, _) | (_, Some("ValidationError")) => StoreError::Validation {
                collection: collection.to_string(),
                missing: api.missing,
            }
            .into(),

            (400, _) | (_, Some("InvalidQuery")) => StoreError::InvalidQuery {
                message: api
                    .message
                    .unwrap_or_else(|| "store rejected the query".to_string()),
            }
            .into(),

            // Gateway-class failures are worth another attempt.
            (502..=504, _) => TransportError::Connection {
                message: api.to_string(),
            }
            .into(),

            _ => TransportError::Http {
                message: api.to_string(),
            }
            .into(),
        }
    }
}

#[async_trait]
impl RecordStore for RemoteStore {
    #[instrument(skip(self, filter), fields(store = %self.base, %collection))]
    async fn list(
        &self,
        collection: &CollectionName,
        filter: Option<&FilterState>,
    ) -> Result<Vec<Record>> {
        debug!("Listing records");
        let path = records_path(collection);
        let filter = filter.cloned().unwrap_or_default();

        let response: ListRecordsResponse = self
            .retry
            .run(|| async {
                self.client
                    .get(&path, &filter)
                    .await
                    .map_err(|f| Self::map_failure(f, collection, None))
            })
            .await?;

        Ok(response.records)
    }

    #[instrument(skip(self), fields(store = %self.base, %collection, %id))]
    async fn get(&self, collection: &CollectionName, id: &RecordId) -> Result<Option<Record>> {
        debug!("Getting record");
        let path = record_path(collection, id);
        let no_params: [(&str, &str); 0] = [];

        let result = self
            .retry
            .run(|| async {
                match self.client.get::<_, Record>(&path, &no_params).await {
                    Ok(record) => Ok(Some(record)),
                    // A missing record is a sentinel, not an error.
                    Err(ApiFailure::Api(api)) if api.status == 404 => Ok(None),
                    Err(f) => Err(Self::map_failure(f, collection, Some(id))),
                }
            })
            .await?;

        Ok(result)
    }

    #[instrument(skip(self, fields), fields(store = %self.base, %collection))]
    async fn create(&self, collection: &CollectionName, fields: RecordFields) -> Result<Record> {
        debug!("Creating record");
        let path = records_path(collection);
        let body = CreateRecordRequest {
            fields: fields.as_value(),
        };

        let record: Record = self
            .retry
            .run(|| async {
                self.client
                    .post(&path, &body)
                    .await
                    .map_err(|f| Self::map_failure(f, collection, None))
            })
            .await?;

        Ok(record)
    }

    #[instrument(skip(self, partial), fields(store = %self.base, %collection, %id))]
    async fn update(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        partial: RecordFields,
    ) -> Result<Record> {
        debug!("Updating record");
        let path = record_path(collection, id);
        let body = UpdateRecordRequest {
            fields: partial.as_value(),
        };

        let record: Record = self
            .retry
            .run(|| async {
                self.client
                    .patch(&path, &body)
                    .await
                    .map_err(|f| Self::map_failure(f, collection, Some(id)))
            })
            .await?;

        Ok(record)
    }

    #[instrument(skip(self), fields(store = %self.base, %collection, %id))]
    async fn delete(&self, collection: &CollectionName, id: &RecordId) -> Result<()> {
        debug!("Deleting record");
        let path = record_path(collection, id);

        self.retry
            .run(|| async {
                self.client
                    .delete(&path)
                    .await
                    .map_err(|f| Self::map_failure(f, collection, Some(id)))
            })
            .await
    }
}
