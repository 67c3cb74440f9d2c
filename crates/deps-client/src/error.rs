//! Metadata client error types.

use deps_core::errors::{Classify, ErrorKind};
use thiserror::Error;

/// Errors that can occur when talking to the package-metadata service.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The service answered 404 for the requested resource.
    #[error("not found: {resource}")]
    NotFound {
        /// What was asked for, e.g. `npm/react@18.3.1`.
        resource: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code other than 404/429.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds the service asked us to wait.
        retry_after_secs: u64,
    },

    /// Failed to decode a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

impl MetadataError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Classify for MetadataError {
    fn kind(&self) -> ErrorKind {
        if self.is_not_found() {
            ErrorKind::NotFound
        } else {
            ErrorKind::Internal
        }
    }
}
