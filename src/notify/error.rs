//! Error types for notification delivery.

use thiserror::Error;

use crate::transport::HttpError;

/// Why a notification could not be handed off.
///
/// These never leave a [`ChangeNotifier`](super::ChangeNotifier); they are
/// logged and turned into a `false` delivery result.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Server returned a non-2xx status.
    #[error("Non-success status: {status}")]
    NonSuccessStatus {
        /// HTTP status code
        status: http::StatusCode,
        /// Response body (if available, for debugging)
        body: Option<String>,
    },

    /// The body template could not be rendered.
    #[error("Template error: {0}")]
    Template(String),

    /// The default JSON body could not be produced.
    #[error("Failed to serialize notification: {0}")]
    Serialize(#[source] serde_json::Error),
}
