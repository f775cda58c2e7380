//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [notify]
            url = "https://mail.example.com/api/send"
            recipient = "ops@example.com"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.notify.url.as_deref(),
            Some("https://mail.example.com/api/send")
        );
        assert_eq!(config.notify.recipient.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn parse_full_notify_section() {
        let toml = r#"
            [notify]
            url = "https://mail.example.com/api/send"
            recipient = "ops@example.com"
            method = "PUT"
            bearer = "secret-token"
            body_template = '{"ip": "{{address}}"}'

            [notify.headers]
            X-Custom-Header = "custom-value"
            Content-Type = "application/json"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let notify = &config.notify;

        assert_eq!(notify.method.as_deref(), Some("PUT"));
        assert_eq!(notify.bearer.as_deref(), Some("secret-token"));
        assert_eq!(
            notify.body_template.as_deref(),
            Some(r#"{"ip": "{{address}}"}"#)
        );
        assert_eq!(notify.headers.len(), 2);
        assert_eq!(
            notify.headers.get("X-Custom-Header").map(String::as_str),
            Some("custom-value")
        );
    }

    #[test]
    fn parse_resolver_and_probe_sections() {
        let toml = r#"
            [resolver]
            endpoints = ["https://one.example.net", "https://two.example.net"]

            [probe]
            url = "https://probe.example.net"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(
            config.resolver.endpoints,
            Some(vec![
                "https://one.example.net".to_string(),
                "https://two.example.net".to_string()
            ])
        );
        assert_eq!(config.probe.url.as_deref(), Some("https://probe.example.net"));
    }

    #[test]
    fn parse_monitor_section() {
        let toml = r"
            [monitor]
            poll_interval = 120
            timeout = 3
        ";

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.monitor.poll_interval, Some(120));
        assert_eq!(config.monitor.timeout, Some(3));
    }

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.notify.url.is_none());
        assert!(config.notify.recipient.is_none());
        assert!(config.resolver.endpoints.is_none());
        assert!(config.probe.url.is_none());
    }

    #[test]
    fn empty_endpoint_list_is_kept_distinct_from_missing() {
        let config = TomlConfig::parse("[resolver]\nendpoints = []").unwrap();

        assert_eq!(config.resolver.endpoints, Some(vec![]));
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            [notify]
            url = "https://example.com"
            unknown_field = "value"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn reject_unknown_sections() {
        let toml = r#"
            [unknown_section]
            key = "value"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }
}

mod default_template {
    use super::*;

    #[test]
    fn template_is_valid_toml() {
        let template = default_config_template();
        let result = TomlConfig::parse(&template);
        assert!(
            result.is_ok(),
            "Template should be valid TOML: {:?}",
            result.err()
        );
    }

    #[test]
    fn template_contains_all_sections() {
        let template = default_config_template();

        for section in ["[notify]", "[resolver]", "[probe]", "[monitor]"] {
            assert!(template.contains(section), "Template should contain {section}");
        }
    }

    #[test]
    fn template_lists_default_endpoints() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();
        let expected: Vec<String> = crate::config::defaults::ENDPOINTS
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(config.resolver.endpoints, Some(expected));
    }

    #[test]
    fn template_documents_required_fields() {
        let template = default_config_template();

        assert!(template.contains("# url ="));
        assert!(template.contains("# recipient ="));
        assert!(template.contains("{{address}}"));
    }
}

mod file_loading {
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [notify]
            url = "https://example.com"
            recipient = "ops@example.com"
        "#
        )
        .unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.notify.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let path = Path::new("nonexistent_config_file_12345.toml");

        assert!(matches!(
            TomlConfig::load(path),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn load_invalid_toml_file_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        assert!(matches!(
            TomlConfig::load(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
