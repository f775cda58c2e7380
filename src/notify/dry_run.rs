//! Log-only notifier.

use super::{ChangeNotifier, Notification, NotifierTarget};
use crate::network::Address;
use crate::time::{Clock, SystemClock};

/// Notifier that logs what it would send and reports success.
///
/// Used by `--dry-run`: the polling loop behaves exactly as in production,
/// including committing the address, but nothing leaves the machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunNotifier;

impl ChangeNotifier for DryRunNotifier {
    async fn notify(&self, address: &Address, target: &NotifierTarget) -> bool {
        let notification = Notification::new(address, target, SystemClock.now());
        tracing::info!(
            "Dry-run: would notify {} with \"{}\": {}",
            notification.recipient,
            notification.subject,
            notification.message
        );
        true
    }
}
