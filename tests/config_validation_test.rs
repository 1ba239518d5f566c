//! Configuration validation tests
//!
//! Tests that verify configuration defaults and structure.

use secrecy::ExposeSecret;
use tomcat_exporter::config::{Config, MetricsConfig, Mode, ServerConfig, TomcatConfig};

#[test]
fn test_default_server_config() {
    // Given: ServerConfig with default values
    let config = ServerConfig::default();

    // Then: Should bind to all interfaces on the exporter port
    assert_eq!(config.addr, "0.0.0.0");
    assert_eq!(config.port, 9116);
}

#[test]
fn test_tomcat_config_defaults() {
    // Given: TomcatConfig with default values
    let config = TomcatConfig::default();

    // Then: Should point at a local manager application
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 8080);
    assert_eq!(config.user, "tomcat");
    assert_eq!(config.mode, Mode::Manager);
    assert_eq!(config.status_path, "/manager/status/all");
    assert_eq!(config.jolokia_path, "/jolokia");
    assert_eq!(config.timeout_seconds, 10);
    assert_eq!(config.base_url(), "http://localhost:8080");
}

#[test]
fn test_metrics_config_defaults() {
    let config = MetricsConfig::default();

    assert_eq!(config.scrape_interval_seconds, 60);
    assert!(config.metric_key_prefix.is_none());
}

#[test]
fn test_mode_deserializes_lowercase() {
    // Given: Mode names as written in a config file
    // When: Deserializing them
    let manager: Mode = serde_json::from_str("\"manager\"").expect("manager");
    let jolokia: Mode = serde_json::from_str("\"jolokia\"").expect("jolokia");

    // Then: Both variants are recognised, anything else is rejected
    assert_eq!(manager, Mode::Manager);
    assert_eq!(jolokia, Mode::Jolokia);
    assert!(serde_json::from_str::<Mode>("\"jmx\"").is_err());
}

#[test]
fn test_partial_config_fills_defaults() {
    // Given: A config document that only sets a few fields
    let json = r#"{
        "tomcat": {"host": "tomcat.internal", "password": "s3cret", "mode": "jolokia"},
        "metrics": {"metric_key_prefix": "catalina"}
    }"#;

    // When: Deserializing it
    let config: Config = serde_json::from_str(json).expect("Failed to deserialize");

    // Then: Missing fields take their defaults
    assert_eq!(config.tomcat.host, "tomcat.internal");
    assert_eq!(config.tomcat.port, 8080);
    assert_eq!(config.tomcat.password.expose_secret(), "s3cret");
    assert_eq!(config.tomcat.mode, Mode::Jolokia);
    assert_eq!(config.server.port, 9116);
    assert_eq!(config.metrics.scrape_interval_seconds, 60);
    assert_eq!(config.metrics.metric_key_prefix.as_deref(), Some("catalina"));
}

#[test]
fn test_invalid_port_is_rejected() {
    let json = r#"{"tomcat": {"port": 70000}}"#;

    let result = serde_json::from_str::<Config>(json);

    assert!(result.is_err(), "Port outside u16 range must be rejected");
}

#[test]
fn test_missing_config_file_uses_defaults() {
    // Given: A path with no config file behind it
    // When: Loading configuration
    let config = Config::load("config/does-not-exist").expect("Missing file is optional");

    // Then: Built-in defaults apply
    assert_eq!(config.tomcat.status_path, "/manager/status/all");
    assert_eq!(config.server.addr, "0.0.0.0");
}

#[test]
fn test_validate_rejects_unusable_settings() {
    // Given: A config without a host and one with a zero timeout
    let mut no_host = Config::default();
    no_host.tomcat.host = "  ".to_string();
    let mut no_timeout = Config::default();
    no_timeout.tomcat.timeout_seconds = 0;

    // Then: Both are rejected with a configuration error
    let message = no_host.validate().unwrap_err().to_string();
    assert!(message.starts_with("Configuration error"));
    assert!(message.contains("tomcat.host"));
    assert!(no_timeout.validate().is_err());
    assert!(Config::default().validate().is_ok());
}
