//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ipwatch: public IPv4 change notifier
///
/// Periodically looks up the public IPv4 address of this machine and
/// notifies a recipient whenever it changes.
#[derive(Debug, Parser)]
#[command(name = "ipwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Notification webhook URL (required for run mode)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Recipient of change notifications (required for run mode)
    #[arg(long, global = true)]
    pub recipient: Option<String>,

    /// HTTP method for notification requests
    #[arg(long)]
    pub method: Option<String>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Bearer token for Authorization header
    #[arg(long)]
    pub bearer: Option<String>,

    /// Handlebars body template for notification requests
    #[arg(long = "body-template")]
    pub body_template: Option<String>,

    /// Address lookup endpoint, tried in order (can be specified multiple times)
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoints: Vec<String>,

    /// URL used to check internet connectivity
    #[arg(long = "probe-url", value_name = "URL")]
    pub probe_url: Option<String>,

    /// Polling interval in seconds
    #[arg(long = "poll-interval")]
    pub poll_interval: Option<u64>,

    /// Timeout in seconds for probe and lookup requests
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Test mode - log changes without sending notifications
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for ipwatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "ipwatch.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
