//! Outbound connectivity check.

use std::time::Duration;

use url::Url;

use crate::transport::{HttpClient, HttpRequest};

/// Default probe target.
pub const DEFAULT_PROBE_URL: &str = "https://www.google.com";

/// Default probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Answers whether outbound network connectivity currently exists.
pub trait ConnectivityProbe: Send + Sync {
    /// Returns `true` if the outside world is reachable.
    ///
    /// Never fails: problems are logged and reported as `false`.
    fn has_connectivity(&self) -> impl std::future::Future<Output = bool> + Send;
}

/// Probe that GETs a well-known, highly available host.
///
/// Only the transport outcome matters. Any HTTP response, including an
/// error status, proves the network path works.
#[derive(Debug, Clone)]
pub struct HttpConnectivityProbe<H> {
    client: H,
    target: Url,
    timeout: Duration,
}

impl<H> HttpConnectivityProbe<H> {
    /// Creates a probe against `target` with the default timeout.
    #[must_use]
    pub const fn new(client: H, target: Url) -> Self {
        Self {
            client,
            target,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Sets the probe timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the probe target.
    #[must_use]
    pub const fn target(&self) -> &Url {
        &self.target
    }
}

impl<H: HttpClient> ConnectivityProbe for HttpConnectivityProbe<H> {
    async fn has_connectivity(&self) -> bool {
        let request = HttpRequest::get(self.target.clone()).with_timeout(self.timeout);

        match self.client.request(request).await {
            Ok(response) => {
                tracing::debug!(
                    "Connectivity probe to {} answered {}",
                    self.target,
                    response.status
                );
                true
            }
            Err(e) => {
                tracing::warn!("Connectivity probe to {} failed: {e}", self.target);
                false
            }
        }
    }
}
