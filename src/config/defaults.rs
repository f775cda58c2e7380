//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default HTTP method for notification requests.
pub const METHOD: &str = "POST";

/// Default polling interval in seconds.
pub const POLL_INTERVAL_SECS: u64 = 10;

/// Default timeout in seconds for probe and lookup requests.
pub const TIMEOUT_SECS: u64 = 5;

/// Default connectivity probe target.
pub const PROBE_URL: &str = crate::network::DEFAULT_PROBE_URL;

/// Default lookup endpoints, in fallback order.
pub const ENDPOINTS: [&str; 4] = [
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://ipecho.net/plain",
    "https://checkip.amazonaws.com",
];

/// Default polling interval as Duration.
#[must_use]
pub const fn poll_interval() -> Duration {
    Duration::from_secs(POLL_INTERVAL_SECS)
}

/// Default request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
