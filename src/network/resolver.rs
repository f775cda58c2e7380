//! Public address resolution over a fallback chain of lookup endpoints.

use std::time::Duration;

use thiserror::Error;

use super::{Address, AddressError, Endpoint};
use crate::transport::{HttpClient, HttpError, HttpRequest};

/// Default per-endpoint timeout.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// How much of a rejected body is kept for diagnostics.
const MAX_RAW_EXCERPT: usize = 64;

/// Why a single endpoint lookup produced no address.
///
/// Request-class failures mean "this endpoint is unusable right now" and the
/// resolver moves on to the next one. Anything else means the resolver
/// itself is in trouble and resolution stops.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never produced a response (timeout, DNS, refused, TLS).
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        /// Endpoint that was queried
        endpoint: Endpoint,
        /// Underlying transport error
        #[source]
        source: HttpError,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("Endpoint {endpoint} answered with status {status}")]
    Status {
        /// Endpoint that was queried
        endpoint: Endpoint,
        /// The status code received
        status: http::StatusCode,
    },

    /// The endpoint answered, but not with an IPv4 address.
    #[error("Endpoint {endpoint} returned invalid address '{raw}'")]
    InvalidAddress {
        /// Endpoint that was queried
        endpoint: Endpoint,
        /// Trimmed response body, cut after a short excerpt
        raw: String,
        /// Validation failure
        #[source]
        source: AddressError,
    },

    /// The lookup failed in a way not attributable to the endpoint.
    #[error("Unexpected failure querying {endpoint}: {reason}")]
    Unexpected {
        /// Endpoint that was being queried
        endpoint: Endpoint,
        /// Description of the failure
        reason: String,
    },
}

impl LookupError {
    /// Returns true if resolution should fall through to the next endpoint.
    #[must_use]
    pub const fn is_request_class(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::Status { .. })
    }

    /// Returns the endpoint the failure belongs to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        match self {
            Self::Request { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::InvalidAddress { endpoint, .. }
            | Self::Unexpected { endpoint, .. } => endpoint,
        }
    }
}

/// Determines the caller's public IPv4 address.
pub trait AddressResolver: Send + Sync {
    /// Tries `endpoints` strictly in order and returns the first valid address.
    ///
    /// Returns `None` when every endpoint failed or when an unexpected
    /// failure aborted the chain. Failures are logged, never returned.
    fn resolve(
        &self,
        endpoints: &[Endpoint],
    ) -> impl std::future::Future<Output = Option<Address>> + Send;
}

/// Resolver that GETs each endpoint and reads the address from the body.
///
/// # Logging
///
/// Each failed endpoint produces exactly one log record: a warning for a
/// request-class failure, an error for an invalid payload or an unexpected
/// failure. Exhausting the chain adds no further record; reporting that is
/// the caller's job.
///
/// # Example
///
/// ```no_run
/// use ipwatch::network::{AddressResolver, Endpoint, HttpAddressResolver};
/// use ipwatch::transport::ReqwestClient;
///
/// # async fn example() {
/// let resolver = HttpAddressResolver::new(ReqwestClient::new());
/// let endpoints = [Endpoint::parse("https://api.ipify.org").unwrap()];
/// if let Some(address) = resolver.resolve(&endpoints).await {
///     println!("public address: {address}");
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpAddressResolver<H> {
    client: H,
    timeout: Duration,
}

impl<H> HttpAddressResolver<H> {
    /// Creates a resolver with the default per-endpoint timeout.
    #[must_use]
    pub const fn new(client: H) -> Self {
        Self {
            client,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Sets the per-endpoint timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the per-endpoint timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<H: HttpClient> HttpAddressResolver<H> {
    /// Queries a single endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] classifying why no address was obtained.
    pub async fn lookup(&self, endpoint: &Endpoint) -> Result<Address, LookupError> {
        let request = HttpRequest::get(endpoint.url().clone()).with_timeout(self.timeout);

        let response = self.client.request(request).await.map_err(|e| {
            if e.is_transport() {
                LookupError::Request {
                    endpoint: endpoint.clone(),
                    source: e,
                }
            } else {
                LookupError::Unexpected {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.is_success() {
            return Err(LookupError::Status {
                endpoint: endpoint.clone(),
                status: response.status,
            });
        }

        let body = String::from_utf8_lossy(&response.body);
        let raw = body.trim();

        Address::parse(raw).map_err(|source| LookupError::InvalidAddress {
            endpoint: endpoint.clone(),
            raw: excerpt(raw),
            source,
        })
    }
}

impl<H: HttpClient> AddressResolver for HttpAddressResolver<H> {
    async fn resolve(&self, endpoints: &[Endpoint]) -> Option<Address> {
        for endpoint in endpoints {
            match self.lookup(endpoint).await {
                Ok(address) => {
                    tracing::debug!("Resolved {address} via {endpoint}");
                    return Some(address);
                }
                Err(e) if e.is_request_class() => {
                    tracing::warn!("Skipping endpoint: {e}");
                }
                Err(e @ LookupError::InvalidAddress { .. }) => {
                    tracing::error!("{e}");
                }
                Err(e) => {
                    tracing::error!("Address resolution aborted: {e}");
                    return None;
                }
            }
        }

        None
    }
}

/// Returns at most [`MAX_RAW_EXCERPT`] bytes of `raw`, on a char boundary.
fn excerpt(raw: &str) -> String {
    if raw.len() <= MAX_RAW_EXCERPT {
        return raw.to_string();
    }

    let mut end = MAX_RAW_EXCERPT;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &raw[..end])
}
