//! Application execution logic.
//!
//! This module wires the validated configuration into a polling controller
//! and drives it until a shutdown signal arrives.

use std::future::Future;

use thiserror::Error;
use tokio::signal;

use ipwatch::config::ValidatedConfig;
use ipwatch::monitor::{PollOptions, PollingController};
use ipwatch::network::{
    AddressResolver, ConnectivityProbe, HttpAddressResolver, HttpConnectivityProbe,
};
use ipwatch::notify::{ChangeNotifier, DryRunNotifier, WebhookNotifier};
use ipwatch::transport::ReqwestClient;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to install an OS signal handler.
    #[error("Failed to install {signal} handler: {source}")]
    SignalHandler {
        /// Signal name
        signal: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Executes the main application loop.
///
/// This function:
/// 1. Creates the HTTP client, connectivity probe and address resolver
/// 2. Creates the notifier (webhook, or logging only in dry-run mode)
/// 3. Runs the polling controller until shutdown signal (Ctrl+C / SIGTERM)
///
/// # Errors
///
/// Returns an error if the shutdown signal handlers cannot be installed.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires a real
/// async runtime with signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let shutdown = shutdown_signal()?;

    let client = ReqwestClient::new();
    let probe = HttpConnectivityProbe::new(client.clone(), config.probe_url.clone())
        .with_timeout(config.timeout);
    let resolver = HttpAddressResolver::new(client.clone()).with_timeout(config.timeout);
    let options = poll_options(&config);

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - notifications will be logged but not sent");
        monitor(probe, resolver, DryRunNotifier, options, shutdown).await;
    } else {
        let notifier = create_notifier(client, &config);
        monitor(probe, resolver, notifier, options, shutdown).await;
    }

    Ok(())
}

/// Extracts the polling loop inputs from the configuration.
fn poll_options(config: &ValidatedConfig) -> PollOptions {
    PollOptions {
        endpoints: config.endpoints.clone(),
        target: config.recipient.clone(),
        interval: config.poll_interval,
    }
}

/// Creates the webhook notifier from configuration.
fn create_notifier<H>(client: H, config: &ValidatedConfig) -> WebhookNotifier<H> {
    let mut notifier = WebhookNotifier::new(client, config.url.clone())
        .with_method(config.method.clone())
        .with_headers(config.headers.clone());

    if let Some(ref template) = config.body_template {
        notifier = notifier.with_body_template(template);
    }

    notifier
}

/// Runs the polling controller until `shutdown` completes.
async fn monitor<P, R, N, F>(probe: P, resolver: R, notifier: N, options: PollOptions, shutdown: F)
where
    P: ConnectivityProbe,
    R: AddressResolver,
    N: ChangeNotifier,
    F: Future<Output = ()>,
{
    let mut controller = PollingController::new(probe, resolver, notifier, options);
    controller.run_until(shutdown).await;
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Handlers are installed eagerly so a failure surfaces before the loop starts.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
fn shutdown_signal() -> Result<impl Future<Output = ()>, RunError> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(
        |source| RunError::SignalHandler {
            signal: "SIGTERM",
            source,
        },
    )?;

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            terminate.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }
    })
}
