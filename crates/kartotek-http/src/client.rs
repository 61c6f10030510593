//! HTTP client for the remote document store.

use std::fmt;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use kartotek_core::StoreUrl;
use kartotek_core::error::{Error, TransportError};

use crate::endpoints::ApiErrorResponse;

/// Upper bound on a single request, beyond which the store is treated as
/// unreachable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A non-2xx response from the store API, with its parsed error body.
#[derive(Debug)]
pub(crate) struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub code: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
    /// Missing required fields reported by validation errors.
    pub missing: Vec<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// A failed store API call.
///
/// Either a response the server produced (to be mapped onto the store
/// error taxonomy with request context) or a transport failure already in
/// its final form.
#[derive(Debug)]
pub(crate) enum ApiFailure {
    Api(ApiError),
    Error(Error),
}

/// Map a reqwest failure onto the transport error classes.
pub(crate) fn map_reqwest(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: REQUEST_TIMEOUT.as_millis() as u64,
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// HTTP client for store API requests.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base: StoreUrl,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new client for the given store.
    pub fn new(base: StoreUrl, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kartotek/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base,
            token,
        }
    }

    /// Returns the store URL this client is configured for.
    pub fn base(&self) -> &StoreUrl {
        &self.base
    }

    /// GET a path with query parameters.
    #[instrument(skip(self, params), fields(store = %self.base))]
    pub async fn get<Q, R>(&self, path: &str, params: &Q) -> Result<R, ApiFailure>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(path, "GET");
        trace!(?params, "query parameters");

        let response = self
            .client
            .get(&url)
            .query(params)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| ApiFailure::Error(map_reqwest(e)))?;

        self.handle_response(response).await
    }

    /// POST a JSON body to a path.
    #[instrument(skip(self, body), fields(store = %self.base))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiFailure>
    where
        B: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(path, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| ApiFailure::Error(map_reqwest(e)))?;

        self.handle_response(response).await
    }

    /// PATCH a JSON body onto a path.
    #[instrument(skip(self, body), fields(store = %self.base))]
    pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R, ApiFailure>
    where
        B: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(path, "PATCH");

        let response = self
            .client
            .patch(&url)
            .json(body)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| ApiFailure::Error(map_reqwest(e)))?;

        self.handle_response(response).await
    }

    /// DELETE a path, expecting no response body.
    #[instrument(skip(self), fields(store = %self.base))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiFailure> {
        let url = self.base.api_url(path);
        debug!(path, "DELETE");

        let response = self
            .client
            .delete(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| ApiFailure::Error(map_reqwest(e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiFailure::Api(self.parse_error_response(response).await))
        }
    }

    /// Create headers for store requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            let auth_value = format!("Bearer {}", token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value).expect("invalid token characters"),
            );
        }
        headers
    }

    /// Handle a store response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, ApiFailure> {
        let status = response.status();
        trace!(status = %status, "store response");

        if status.is_success() {
            let body = response
                .json::<R>()
                .await
                .map_err(|e| ApiFailure::Error(map_reqwest(e)))?;
            Ok(body)
        } else {
            Err(ApiFailure::Api(self.parse_error_response(response).await))
        }
    }

    /// Parse an error response body.
    async fn parse_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorResponse>().await {
            Ok(body) => ApiError {
                status,
                code: body.error,
                message: body.message,
                missing: body.missing,
            },
            Err(_) => ApiError {
                status,
                code: None,
                message: None,
                missing: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let base = StoreUrl::new("https://records.example.com").unwrap();
        let client = HttpClient::new(base.clone(), None);
        assert_eq!(client.base().as_str(), base.as_str());
    }

    #[test]
    fn api_error_display() {
        let err = ApiError {
            status: 422,
            code: Some("ValidationError".to_string()),
            message: Some("missing name".to_string()),
            missing: vec!["name".to_string()],
        };
        assert_eq!(err.to_string(), "HTTP 422 [ValidationError]: missing name");
    }
}
