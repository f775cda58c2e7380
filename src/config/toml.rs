//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Notification configuration section
    #[serde(default)]
    pub notify: NotifySection,

    /// Address lookup configuration
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Connectivity probe configuration
    #[serde(default)]
    pub probe: ProbeSection,

    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,
}

/// Notification configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySection {
    /// Webhook URL
    pub url: Option<String>,

    /// Who is told about address changes
    pub recipient: Option<String>,

    /// HTTP method (default: POST)
    pub method: Option<String>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Bearer token for Authorization header
    pub bearer: Option<String>,

    /// Handlebars body template
    pub body_template: Option<String>,
}

/// Address lookup configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// Lookup endpoints in fallback order
    pub endpoints: Option<Vec<String>>,
}

/// Connectivity probe configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    /// Probe target URL
    pub url: Option<String>,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Polling interval in seconds
    pub poll_interval: Option<u64>,

    /// Probe and lookup request timeout in seconds
    pub timeout: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ipwatch Configuration File

[notify]
# Webhook URL that receives change notifications (required)
# url = "https://mail.example.com/api/send"

# Recipient of change notifications (required)
# recipient = "ops@example.com"

# HTTP method (default: POST, can be overridden by --method CLI flag)
# method = "POST"

# HTTP headers
# [notify.headers]
# X-Custom-Header = "value"

# Bearer token for Authorization header
# bearer = "your-token-here"

# Handlebars body template (default: JSON notification)
# Available variables: {{recipient}}, {{address}}, {{subject}}, {{message}}, {{timestamp}}
# body_template = '{"to": "{{recipient}}", "text": "{{message}}"}'

[resolver]
# Lookup endpoints, tried in order until one returns a valid IPv4 address
# Note: CLI --endpoint values REPLACE this list entirely (not merged)
endpoints = [
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://ipecho.net/plain",
    "https://checkip.amazonaws.com",
]

[probe]
# URL used to check internet connectivity before each lookup
# url = "https://www.google.com"

[monitor]
# Polling interval in seconds (default: 10)
poll_interval = 10

# Timeout in seconds for probe and lookup requests (default: 5)
# timeout = 5
"#
    .to_string()
}
