//! Error types for kartotek.
//!
//! This module provides a unified error type with explicit variants for
//! store, transport, and input validation failures.

use thiserror::Error;

/// The unified error type for kartotek operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Store-level errors (validation, missing records, bad queries).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Network transport errors (connection, timeout, HTTP).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Input validation errors (invalid collection name, id, URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Check whether this error is a transient transport failure.
    ///
    /// Transient failures are candidates for bounded retry; everything
    /// else propagates immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::Connection { .. })
                | Error::Transport(TransportError::Timeout { .. })
        )
    }

    /// Check whether this error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound { .. }))
    }
}

/// Store-level errors surfaced by record store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Required fields were absent on create or update.
    #[error("validation failed for '{collection}': missing {}", missing.join(", "))]
    Validation {
        /// The collection whose schema rejected the fields.
        collection: String,
        /// The required field names that were absent.
        missing: Vec<String>,
    },

    /// No record with the given id exists in the collection.
    #[error("record '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },

    /// A filter referenced a key the collection's schema does not back.
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    /// The store could not be reached after the configured retries.
    #[error("store unavailable after {attempts} attempt(s): {message}")]
    Unavailable { message: String, attempts: u32 },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP or I/O error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid collection name format.
    #[error("invalid collection name '{value}': {reason}")]
    CollectionName { value: String, reason: String },

    /// Invalid record id format.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Invalid store URL format.
    #[error("invalid store URL '{value}': {reason}")]
    StoreUrl { value: String, reason: String },

    /// Invalid record fields payload.
    #[error("invalid record fields: {reason}")]
    Fields { reason: String },

    /// Invalid page parameters.
    #[error("invalid page: {reason}")]
    Page { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
