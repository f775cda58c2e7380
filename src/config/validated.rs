//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use handlebars::Handlebars;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

use crate::network::Endpoint;
use crate::notify::NotifierTarget;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Notification webhook URL (required)
    pub url: Url,

    /// Recipient of change notifications (required)
    pub recipient: NotifierTarget,

    /// HTTP method for notification requests
    pub method: Method,

    /// HTTP headers for notification requests
    pub headers: HeaderMap,

    /// Handlebars body template (optional)
    pub body_template: Option<String>,

    /// Lookup endpoints in fallback order, never empty
    pub endpoints: Vec<Endpoint>,

    /// Connectivity probe target
    pub probe_url: Url,

    /// Polling interval
    pub poll_interval: Duration,

    /// Timeout for probe and lookup requests
    pub timeout: Duration,

    /// Dry-run mode (log changes without sending notifications)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ url: {}, recipient: {}, method: {}, endpoints: {}, probe: {}, \
             poll_interval: {}s, timeout: {}s, dry_run: {} }}",
            self.url,
            self.recipient,
            self.method,
            self.endpoints.len(),
            self.probe_url,
            self.poll_interval.as_secs(),
            self.timeout.as_secs(),
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`url`, `recipient`)
    /// - A URL is invalid or not http(s)
    /// - The endpoint list is empty
    /// - Duration values are zero
    /// - Header format, method or body template is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;
        let recipient = Self::resolve_recipient(cli, toml)?;
        let method = Self::resolve_method(cli, toml)?;
        let headers = Self::resolve_headers(cli, toml)?;
        let body_template = Self::resolve_body_template(cli, toml)?;
        let endpoints = Self::resolve_endpoints(cli, toml)?;
        let probe_url = Self::resolve_probe_url(cli, toml)?;

        let poll_interval = resolve_seconds(
            "poll_interval",
            cli.poll_interval,
            toml.and_then(|t| t.monitor.poll_interval),
            defaults::POLL_INTERVAL_SECS,
        )?;

        let timeout = resolve_seconds(
            "timeout",
            cli.timeout,
            toml.and_then(|t| t.monitor.timeout),
            defaults::TIMEOUT_SECS,
        )?;

        Ok(Self {
            url,
            recipient,
            method,
            headers,
            body_template,
            endpoints,
            probe_url,
            poll_interval,
            timeout,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.notify.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set notify.url in config file")
            })?;

        parse_http_url(url_str)
    }

    fn resolve_recipient(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<NotifierTarget, ConfigError> {
        cli.recipient
            .as_deref()
            .or_else(|| toml.and_then(|t| t.notify.recipient.as_deref()))
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(NotifierTarget::from)
            .ok_or_else(|| {
                ConfigError::missing(
                    field::RECIPIENT,
                    "Use --recipient or set notify.recipient in config file",
                )
            })
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.notify.method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // TOML first so CLI can override
        if let Some(toml) = toml {
            for (name, value) in &toml.notify.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        let bearer = cli
            .bearer
            .as_deref()
            .or_else(|| toml.and_then(|t| t.notify.bearer.as_deref()));

        if let Some(token) = bearer {
            let auth_value = format!("Bearer {token}");
            let header_value = parse_header_value("Authorization", &auth_value)?;
            headers.insert(AUTHORIZATION, header_value);
        }

        Ok(headers)
    }

    fn resolve_body_template(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<String>, ConfigError> {
        let template = cli
            .body_template
            .clone()
            .or_else(|| toml.and_then(|t| t.notify.body_template.clone()));

        if let Some(ref tmpl) = template {
            Self::validate_template(tmpl)?;
        }

        Ok(template)
    }

    fn validate_template(template: &str) -> Result<(), ConfigError> {
        let hbs = Handlebars::new();
        // Syntax check only; an empty context renders missing variables as blanks
        hbs.render_template(template, &serde_json::json!({}))
            .map_err(|e| ConfigError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn resolve_endpoints(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<Endpoint>, ConfigError> {
        // CLI list replaces the TOML list entirely
        let raw: Vec<&str> = if cli.endpoints.is_empty() {
            toml.and_then(|t| t.resolver.endpoints.as_ref()).map_or_else(
                || defaults::ENDPOINTS.to_vec(),
                |list| list.iter().map(String::as_str).collect(),
            )
        } else {
            cli.endpoints.iter().map(String::as_str).collect()
        };

        if raw.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        raw.into_iter()
            .map(|s| parse_http_url(s).map(Endpoint::new))
            .collect()
    }

    fn resolve_probe_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .probe_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.probe.url.as_deref()))
            .unwrap_or(defaults::PROBE_URL);

        parse_http_url(url_str)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn resolve_seconds(
    name: &'static str,
    cli: Option<u64>,
    toml: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    // Priority: CLI explicit > TOML > default
    let seconds = cli.or(toml).unwrap_or(default);

    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field: name,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_http_url(s: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
        url: s.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: s.to_string(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
