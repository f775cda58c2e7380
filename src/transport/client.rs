//! Production HTTP client implementation using reqwest.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` that implements [`HttpClient`].
/// Timeouts are applied per request from [`HttpRequest::timeout`], so one
/// client (and its connection pool) is shared by every collaborator.
///
/// # Example
///
/// ```no_run
/// use ipwatch::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.ipify.org")?;
/// let request = HttpRequest::get(url).with_timeout(Duration::from_secs(5));
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound on how much of a response body is buffered.
///
/// Anything beyond it is dropped; lookup answers and webhook replies are tiny.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Maps a reqwest failure onto the transport error taxonomy.
fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else if e.is_connect() || e.is_request() || e.is_body() || e.is_redirect() {
        HttpError::Connection(Box::new(e))
    } else {
        HttpError::Internal(e.to_string())
    }
}

/// Maps a failure while reading the response body.
///
/// Once headers arrived the client has done its part, so a truncated or
/// undecodable body is the remote side's fault.
fn classify_body(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Connection(Box::new(e))
    }
}

/// Reads at most [`MAX_BODY_BYTES`] of the body.
async fn read_body(mut response: reqwest::Response) -> Result<Vec<u8>, HttpError> {
    let mut body = Vec::new();

    while let Some(chunk) = response.chunk().await.map_err(classify_body)? {
        let room = MAX_BODY_BYTES - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = read_body(response).await?;

        Ok(HttpResponse::new(status, headers, body))
    }
}
