//! Enrichment error types.

use thiserror::Error;

/// Errors that can occur while querying an external metadata source.
///
/// These never escape [`Enricher`](crate::Enricher); they exist so clients
/// can report what went wrong and so retries can tell transient failures
/// apart from permanent ones.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The source answered with a server-side failure status.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The external source returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// The source rejected the request (client-side failure status or an
    /// error payload).
    #[error("{source_name} rejected the request: {message}")]
    Rejected {
        source_name: String,
        message: String,
    },

    /// A response from an external source could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl EnrichError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Rejected { .. } | Self::Parse { .. } => false,
        }
    }

    /// Classify a non-success HTTP status from `source_name`.
    pub(crate) fn from_status(source_name: &str, status: reqwest::StatusCode) -> Self {
        let source_name = source_name.to_string();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            Self::RateLimited { source_name }
        } else if status.is_server_error() {
            Self::Http {
                source_name,
                message: status.to_string(),
            }
        } else {
            Self::Rejected {
                source_name,
                message: status.to_string(),
            }
        }
    }
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;
