//! Notification layer: telling the operator that the public address moved.
//!
//! This module provides types and traits for:
//! - The notification capability used by the polling loop ([`ChangeNotifier`])
//! - Recipient identity ([`NotifierTarget`]) and message content ([`Notification`])
//! - HTTP webhook delivery ([`WebhookNotifier`])
//! - Log-only delivery for dry runs ([`DryRunNotifier`])

mod dry_run;
mod error;
mod message;
mod webhook;


pub use dry_run::DryRunNotifier;
pub use error::NotifyError;
pub use message::{Notification, NotifierTarget, SUBJECT};
pub use webhook::{DEFAULT_NOTIFY_TIMEOUT, WebhookNotifier};

use crate::network::Address;

/// Capability to deliver "your public address changed" to a recipient.
///
/// # Contract
///
/// Implementations never fail outward. Transport problems are logged and
/// reported as `false`; `true` means the message was handed off for
/// delivery, not that anyone read it.
pub trait ChangeNotifier: Send + Sync {
    /// Announces `address` to `target`.
    fn notify(
        &self,
        address: &Address,
        target: &NotifierTarget,
    ) -> impl std::future::Future<Output = bool> + Send;
}
