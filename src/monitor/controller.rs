//! The change-detection loop.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;

use crate::network::{Address, AddressResolver, ConnectivityProbe, Endpoint};
use crate::notify::{ChangeNotifier, NotifierTarget};
use crate::time::{Sleeper, TokioSleeper};

/// What a single check cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The connectivity probe failed; nothing else was attempted.
    NoConnectivity,
    /// No endpoint produced a valid address.
    Unresolved,
    /// The resolved address equals the last confirmed one.
    Unchanged(Address),
    /// A new address was announced and committed.
    Notified(Address),
    /// A new address was found but the notifier reported failure.
    /// It was not committed, so the next cycle announces it again.
    NotifyFailed(Address),
}

/// State carried from one cycle to the next.
///
/// Lives only as long as the controller; a restart starts empty and the
/// first resolved address is announced again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// Last address whose notification was handed off successfully.
    pub last_confirmed_address: Option<Address>,
}

/// Static inputs of the polling loop.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Lookup endpoints in fallback order.
    pub endpoints: Vec<Endpoint>,
    /// Who is told about changes.
    pub target: NotifierTarget,
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
}

/// Drives probe → resolve → compare → notify → commit, one cycle at a time.
///
/// # State machine
///
/// The controller is idle between cycles and checking during one. The
/// confirmed address is written in exactly one place: after the notifier
/// returned `true` for it. A failed notification therefore never loses a
/// change, and an unchanged address never produces a duplicate.
///
/// # Type Parameters
///
/// - `P`: [`ConnectivityProbe`]
/// - `R`: [`AddressResolver`]
/// - `N`: [`ChangeNotifier`]
/// - `S`: [`Sleeper`] pacing the loop (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use ipwatch::monitor::{PollOptions, PollingController};
/// use ipwatch::network::{Endpoint, HttpAddressResolver, HttpConnectivityProbe};
/// use ipwatch::notify::DryRunNotifier;
/// use ipwatch::transport::ReqwestClient;
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() {
/// let client = ReqwestClient::new();
/// let probe = HttpConnectivityProbe::new(client.clone(), Url::parse("https://www.google.com").unwrap());
/// let resolver = HttpAddressResolver::new(client);
/// let options = PollOptions {
///     endpoints: vec![Endpoint::parse("https://api.ipify.org").unwrap()],
///     target: "ops@example.com".into(),
///     interval: Duration::from_secs(60),
/// };
///
/// let mut controller = PollingController::new(probe, resolver, DryRunNotifier, options);
/// controller.run().await;
/// # }
/// ```
#[derive(Debug)]
pub struct PollingController<P, R, N, S = TokioSleeper> {
    probe: P,
    resolver: R,
    notifier: N,
    sleeper: S,
    options: PollOptions,
    state: ControllerState,
}

impl<P, R, N> PollingController<P, R, N, TokioSleeper> {
    /// Creates a controller with empty state.
    #[must_use]
    pub fn new(probe: P, resolver: R, notifier: N, options: PollOptions) -> Self {
        Self {
            probe,
            resolver,
            notifier,
            sleeper: TokioSleeper,
            options,
            state: ControllerState::default(),
        }
    }
}

impl<P, R, N, S> PollingController<P, R, N, S> {
    /// Sets a custom sleeper for the pause between cycles.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> PollingController<P, R, N, S2> {
        PollingController {
            probe: self.probe,
            resolver: self.resolver,
            notifier: self.notifier,
            sleeper,
            options: self.options,
            state: self.state,
        }
    }

    /// Returns the last address that was successfully announced.
    #[must_use]
    pub const fn last_confirmed_address(&self) -> Option<Address> {
        self.state.last_confirmed_address
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Returns the loop options.
    #[must_use]
    pub const fn options(&self) -> &PollOptions {
        &self.options
    }
}

impl<P, R, N, S> PollingController<P, R, N, S>
where
    P: ConnectivityProbe,
    R: AddressResolver,
    N: ChangeNotifier,
    S: Sleeper,
{
    /// Runs one check cycle.
    pub async fn check_and_notify(&mut self) -> CycleOutcome {
        if !self.probe.has_connectivity().await {
            tracing::error!("No connectivity, skipping address check");
            return CycleOutcome::NoConnectivity;
        }

        let Some(address) = self.resolver.resolve(&self.options.endpoints).await else {
            tracing::error!("Could not resolve public address from any endpoint");
            return CycleOutcome::Unresolved;
        };

        if self.state.last_confirmed_address == Some(address) {
            tracing::info!("Address {address} unchanged");
            return CycleOutcome::Unchanged(address);
        }

        let target = &self.options.target;
        if !self.notifier.notify(&address, target).await {
            tracing::error!("Could not send address change ({address}) to {target}");
            return CycleOutcome::NotifyFailed(address);
        }

        tracing::info!("Address changed to {address}, notification sent to {target}");
        self.state.last_confirmed_address = Some(address);
        CycleOutcome::Notified(address)
    }

    /// Runs one cycle, containing any panic raised inside it.
    ///
    /// Returns `None` if the cycle panicked.
    pub async fn guarded_cycle(&mut self) -> Option<CycleOutcome> {
        match AssertUnwindSafe(self.check_and_notify())
            .catch_unwind()
            .await
        {
            Ok(outcome) => Some(outcome),
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!("Address check cycle failed: {reason}");
                None
            }
        }
    }

    /// Runs cycles forever, sleeping the configured interval between them.
    pub async fn run(&mut self) {
        self.run_until(std::future::pending::<()>()).await;
    }

    /// Runs cycles until `shutdown` completes.
    ///
    /// Shutdown is checked before every cycle and also interrupts a cycle
    /// or sleep in progress. An interrupted cycle commits nothing.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: std::future::Future<Output = ()>,
    {
        tracing::info!(
            "Starting address monitor ({} endpoint(s), interval: {}s)",
            self.options.endpoints.len(),
            self.options.interval.as_secs()
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping address monitor");
                    return;
                }

                () = self.cycle_then_sleep() => {}
            }
        }
    }

    async fn cycle_then_sleep(&mut self) {
        self.guarded_cycle().await;
        self.sleeper.sleep(self.options.interval).await;
    }
}
