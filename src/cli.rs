//! Command Line Arguments
//!
//! Every flag overrides the matching configuration value. Host agents pass
//! settings through the environment, so most flags also read an env var.

use crate::config::{Config, Mode};
use clap::builder::FalseyValueParser;
use clap::Parser;
use secrecy::SecretString;

/// Set by the host agent when it asks a plugin for its graph definitions.
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

#[derive(Parser, Debug)]
#[command(name = "tomcat-exporter", author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    pub config: String,

    /// Tomcat host (overrides config)
    #[arg(long, env = "TOMCAT_HOST")]
    pub host: Option<String>,

    /// Tomcat port (overrides config)
    #[arg(long, env = "TOMCAT_PORT")]
    pub port: Option<u16>,

    /// Manager user (overrides config)
    #[arg(long, env = "TOMCAT_USER")]
    pub user: Option<String>,

    /// Manager password (overrides config)
    #[arg(long, env = "TOMCAT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Status source (overrides config)
    #[arg(long, value_enum)]
    pub module: Option<Mode>,

    /// Metric key prefix (overrides config)
    #[arg(long)]
    pub metric_key_prefix: Option<String>,

    /// Run a single collection and print plugin lines instead of serving
    #[arg(long)]
    pub once: bool,

    /// With --once, print graph definitions instead of values.
    /// Any env value other than empty, 0, false, no or off turns it on.
    #[arg(long, env = META_ENV, value_parser = FalseyValueParser::new())]
    pub meta: bool,

    /// Port to listen on for metrics
    #[arg(long, env = "EXPORTER_PORT")]
    pub listen_port: Option<u16>,

    /// Address to bind to
    #[arg(long, env = "EXPORTER_ADDR")]
    pub listen_addr: Option<String>,
}

impl Args {
    /// Overwrite `config` with every value given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.tomcat.host = host.clone();
        }
        if let Some(port) = self.port {
            config.tomcat.port = port;
        }
        if let Some(user) = &self.user {
            config.tomcat.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.tomcat.password = SecretString::from(password.clone());
        }
        if let Some(mode) = self.module {
            config.tomcat.mode = mode;
        }
        if let Some(prefix) = &self.metric_key_prefix {
            config.metrics.metric_key_prefix = Some(prefix.clone());
        }
        if let Some(port) = self.listen_port {
            config.server.port = port;
        }
        if let Some(addr) = &self.listen_addr {
            config.server.addr = addr.clone();
        }
    }
}
