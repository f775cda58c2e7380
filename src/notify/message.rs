//! Notification content.

use std::fmt;
use std::time::SystemTime;

use serde::Serialize;

use crate::network::Address;

/// Subject line of every change notification.
pub const SUBJECT: &str = "Public IP Changed";

/// Who gets told about address changes (for example an e-mail address).
///
/// Passed through to the transport untouched; no validation happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotifierTarget(String);

impl NotifierTarget {
    /// Creates a target from any string-like recipient.
    #[must_use]
    pub fn new(recipient: impl Into<String>) -> Self {
        Self(recipient.into())
    }

    /// Returns the recipient identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NotifierTarget {
    fn from(recipient: &str) -> Self {
        Self::new(recipient)
    }
}

impl From<String> for NotifierTarget {
    fn from(recipient: String) -> Self {
        Self(recipient)
    }
}

impl fmt::Display for NotifierTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rendered change notification.
///
/// Serialized as the default webhook body, and exposed to body templates
/// as `{{recipient}}`, `{{address}}`, `{{subject}}`, `{{message}}` and
/// `{{timestamp}}` (Unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Recipient identifier
    pub recipient: String,
    /// The new public address
    pub address: String,
    /// Subject line
    pub subject: String,
    /// Human-readable body
    pub message: String,
    /// When the notification was built, in Unix seconds
    pub timestamp: u64,
}

impl Notification {
    /// Builds the notification for `address` addressed to `target`.
    #[must_use]
    pub fn new(address: &Address, target: &NotifierTarget, at: SystemTime) -> Self {
        // Pre-epoch clocks only happen on broken systems
        let timestamp = at
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());

        Self {
            recipient: target.to_string(),
            address: address.to_string(),
            subject: SUBJECT.to_string(),
            message: format!("Your new public IP address is: {address}"),
            timestamp,
        }
    }
}
