use tomcat_exporter::config::{Config, Mode};

#[test]
fn test_config_load() {
    // This assumes config/Default.toml exists relative to where cargo test is run
    let config_res = Config::load("config/Default.toml");
    assert!(config_res.is_ok(), "Failed to load default config");

    let config = config_res.unwrap();
    assert_eq!(config.tomcat.mode, Mode::Manager);
    assert_eq!(config.tomcat.timeout_seconds, 10);
    assert_eq!(config.metrics.metric_key_prefix.as_deref(), Some("tomcat"));
}
