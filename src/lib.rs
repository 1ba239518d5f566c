//! Tomcat Metrics Exporter
//!
//! Polls a Tomcat instance's status endpoint and turns it into a flat set of
//! named metrics, together with graph definitions describing how to display
//! them.
//!
//! # Overview
//!
//! Two upstream sources are supported:
//!
//! - the manager status page (`/manager/status/all?XML=true`, Basic auth)
//! - a Jolokia agent (`/jolokia/read/<mbean>`)
//!
//! Both normalize into the same [`MetricMap`](tomcat::MetricMap) schema:
//! `free`, `total`, `max`, `used` and nine per-connector metrics keyed by
//! protocol, e.g. `thread.http.currentThreadsBusy` or
//! `request.count.ajp.errorCount`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   XML / JSON    ┌───────────────────────────────┐
//! │   Tomcat    │ ◄─────────────► │ TomcatClient                  │
//! │  manager /  │     HTTP        │   └ decode → normalize        │
//! │   Jolokia   │                 │        │                      │
//! └─────────────┘                 │        ▼ MetricMap            │
//!                                 │  ┌──────────┐  ┌────────────┐ │
//!                                 │  │ plugin   │  │ metrics +  │ │
//!                                 │  │ (stdout) │  │ server     │ │
//!                                 │  └──────────┘  └────────────┘ │
//!                                 └───────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`tomcat`] - HTTP client, decoding, normalization and the graph catalog
//! - [`plugin`] - one-shot agent plugin output
//! - [`metrics`] - Prometheus metric families
//! - [`server`] - HTTP server and collection loop
//! - [`cli`] - Command line arguments
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use tomcat_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod plugin;
pub mod server;
pub mod tomcat;
