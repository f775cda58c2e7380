//! Network layer: the public address, where to learn it, and whether the
//! network is up at all.
//!
//! This module provides types and traits for:
//! - Validated IPv4 addresses ([`Address`], [`is_valid_ipv4`])
//! - Address-lookup endpoints ([`Endpoint`])
//! - Fallback-chained public address resolution ([`AddressResolver`], [`HttpAddressResolver`])
//! - Connectivity checks ([`ConnectivityProbe`], [`HttpConnectivityProbe`])

mod address;
mod endpoint;
mod probe;
mod resolver;

#[cfg(test)]
mod resolver_tests;

pub use address::{Address, AddressError, is_valid_ipv4};
pub use endpoint::Endpoint;
pub use probe::{ConnectivityProbe, DEFAULT_PROBE_TIMEOUT, DEFAULT_PROBE_URL, HttpConnectivityProbe};
pub use resolver::{AddressResolver, DEFAULT_LOOKUP_TIMEOUT, HttpAddressResolver, LookupError};
