//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// [`HttpError::is_transport`] separates failures attributable to the
/// remote side from failures of the client itself.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS failures and broken response bodies.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL could not be turned into a request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client failed for a reason unrelated to the remote host.
    #[error("HTTP client failure: {0}")]
    Internal(String),
}

impl HttpError {
    /// Returns true for request-class failures: the remote endpoint is down,
    /// slow, unreachable or unusable, but the client itself is healthy.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout | Self::InvalidUrl(_) => true,
            Self::Internal(_) => false,
        }
    }
}
