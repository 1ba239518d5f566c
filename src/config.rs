use crate::error::ExporterError;
use anyhow::{Context, Result};
use clap::ValueEnum;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub tomcat: TomcatConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Which upstream endpoint a fetch cycle reads.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Manager status page (`?XML=true`), Basic auth.
    #[default]
    Manager,
    /// Jolokia agent, one read per mbean query, no credentials.
    Jolokia,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TomcatConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_tomcat_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: SecretString,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_status_path")]
    pub status_path: String,
    #[serde(default = "default_jolokia_path")]
    pub jolokia_path: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_scrape_interval")]
    pub scrape_interval_seconds: u64,
    #[serde(default)]
    pub metric_key_prefix: Option<String>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_tomcat_port() -> u16 {
    8080
}

fn default_user() -> String {
    "tomcat".to_string()
}

fn default_password() -> SecretString {
    SecretString::from(std::env::var("TOMCAT_PASSWORD").unwrap_or_default())
}

fn default_status_path() -> String {
    "/manager/status/all".to_string()
}

fn default_jolokia_path() -> String {
    "/jolokia".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9116
}

fn default_scrape_interval() -> u64 {
    60
}

impl Default for TomcatConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_tomcat_port(),
            user: default_user(),
            password: default_password(),
            mode: Mode::default(),
            status_path: default_status_path(),
            jolokia_path: default_jolokia_path(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            scrape_interval_seconds: default_scrape_interval(),
            metric_key_prefix: None,
        }
    }
}

impl TomcatConfig {
    /// Base URL of the monitored Tomcat, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("TOMCAT_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no fetch cycle could work with.
    pub fn validate(&self) -> std::result::Result<(), ExporterError> {
        if self.tomcat.host.trim().is_empty() {
            return Err(ExporterError::Config("tomcat.host must not be empty".to_string()));
        }
        if self.tomcat.timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "tomcat.timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
