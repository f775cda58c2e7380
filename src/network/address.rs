//! Validated public IPv4 address.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

/// Why a candidate string is not a dotted-quad IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Nothing left after trimming, or nothing at all.
    #[error("empty address")]
    Empty,

    /// Not exactly four dot-separated parts.
    #[error("'{value}' has {count} octets, expected 4")]
    OctetCount {
        /// The rejected candidate
        value: String,
        /// Number of dot-separated parts found
        count: usize,
    },

    /// An octet is empty or contains something other than ASCII digits.
    #[error("'{value}' has non-numeric octet '{octet}'")]
    NonNumeric {
        /// The rejected candidate
        value: String,
        /// The offending octet
        octet: String,
    },

    /// An octet is larger than 255.
    #[error("'{value}' has octet '{octet}' out of range 0-255")]
    OutOfRange {
        /// The rejected candidate
        value: String,
        /// The offending octet
        octet: String,
    },
}

/// A public IPv4 address that passed strict dotted-quad validation.
///
/// Accepted input is exactly four `.`-separated decimal integers in
/// `0..=255` with nothing before, after, or between them. IPv6 literals,
/// hostnames, signs and surrounding whitespace are all rejected, so callers
/// that read addresses off the wire must trim first.
///
/// # Example
///
/// ```
/// use ipwatch::network::Address;
///
/// let address: Address = "203.0.113.42".parse().unwrap();
/// assert_eq!(address.to_string(), "203.0.113.42");
/// assert!("2001:db8::1".parse::<Address>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(Ipv4Addr);

impl Address {
    /// Parses and validates a dotted-quad candidate.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] describing the first rule the candidate breaks.
    pub fn parse(candidate: &str) -> Result<Self, AddressError> {
        if candidate.is_empty() {
            return Err(AddressError::Empty);
        }

        let parts: Vec<&str> = candidate.split('.').collect();
        if parts.len() != 4 {
            return Err(AddressError::OctetCount {
                value: candidate.to_string(),
                count: parts.len(),
            });
        }

        let mut octets = [0u8; 4];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            *slot = parse_octet(candidate, part)?;
        }

        Ok(Self(Ipv4Addr::from(octets)))
    }

    /// Returns the underlying standard library address.
    #[must_use]
    pub const fn ip(&self) -> Ipv4Addr {
        self.0
    }

    /// Returns the four octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }
}

fn parse_octet(candidate: &str, octet: &str) -> Result<u8, AddressError> {
    // u8::from_str would accept a leading '+'
    if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::NonNumeric {
            value: candidate.to_string(),
            octet: octet.to_string(),
        });
    }

    octet.parse::<u8>().map_err(|_| AddressError::OutOfRange {
        value: candidate.to_string(),
        octet: octet.to_string(),
    })
}

/// Returns true if `candidate` is a strict dotted-quad IPv4 address.
#[must_use]
pub fn is_valid_ipv4(candidate: &str) -> bool {
    Address::parse(candidate).is_ok()
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Self(ip)
    }
}

impl From<Address> for Ipv4Addr {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
