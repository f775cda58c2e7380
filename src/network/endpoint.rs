//! Address-lookup endpoints.

use std::fmt;

use url::Url;

/// URL of an external service that answers a plain GET with the caller's
/// public IP address as the response body.
///
/// Endpoints are queried in list order, so the position in the list is the
/// fallback priority. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Wraps an already-parsed URL.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self(url)
    }

    /// Parses an endpoint from a string.
    ///
    /// # Errors
    ///
    /// Returns the URL parse error if `s` is not an absolute URL.
    pub fn parse(s: &str) -> Result<Self, url::ParseError> {
        Url::parse(s).map(Self)
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }
}

impl From<Url> for Endpoint {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
