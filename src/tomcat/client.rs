//! Tomcat HTTP Client
//!
//! Fetches status documents from a running Tomcat and runs them through the
//! decoder and normalizer.
//!
//! # Endpoints
//!
//! - **Manager**: `GET http://<host>:<port>/manager/status/all?XML=true` with
//!   HTTP Basic credentials, one request per cycle
//! - **Jolokia**: `GET http://<host>:<port>/jolokia/read/<mbean>` without
//!   credentials; one request per ThreadPool attribute plus one for
//!   GlobalRequestProcessor, sent sequentially
//!
//! A cycle never retries. The first failing request aborts it and its error is
//! returned unchanged; no partial [`MetricMap`] is produced.
//!
//! # Example
//!
//! ```no_run
//! use tomcat_exporter::config::TomcatConfig;
//! use tomcat_exporter::tomcat::TomcatClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = TomcatClient::new(TomcatConfig::default())?;
//! let metrics = client.fetch_metrics().await?;
//! for (key, value) in &metrics {
//!     println!("{key} = {value}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::{Mode, TomcatConfig};
use crate::error::{ExporterError, Result};
use crate::tomcat::decode::{decode_jolokia, decode_status};
use crate::tomcat::normalize::{
    merge_request_processor, merge_thread_pool, normalize_status, MetricMap,
};
use crate::tomcat::types::{
    RequestProcessorStats, ThreadPoolEntry, REQUEST_PROCESSOR_MBEAN, THREAD_POOL_ATTRIBUTES,
    THREAD_POOL_MBEAN,
};
use reqwest::RequestBuilder;
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::debug;

/// Client for one Tomcat instance.
///
/// Holds only immutable configuration and a pooled HTTP client, so it can be
/// shared across tasks and used for overlapping cycles.
#[derive(Debug, Clone)]
pub struct TomcatClient {
    config: TomcatConfig,
    http: reqwest::Client,
}

impl TomcatClient {
    pub fn new(config: TomcatConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// URL of the manager status page in XML form.
    pub fn status_url(&self) -> String {
        format!(
            "{}{}?XML=true",
            self.config.base_url(),
            absolute_path(&self.config.status_path)
        )
    }

    /// URL of a Jolokia read for `mbean` (optionally `<mbean>/<attribute>`).
    pub fn jolokia_url(&self, mbean: &str) -> String {
        format!(
            "{}{}/read/{}",
            self.config.base_url(),
            absolute_path(self.config.jolokia_path.trim_end_matches('/')),
            mbean
        )
    }

    /// Run one fetch cycle for the configured mode.
    pub async fn fetch_metrics(&self) -> Result<MetricMap> {
        match self.config.mode {
            Mode::Manager => self.fetch_manager_metrics().await,
            Mode::Jolokia => self.fetch_jolokia_metrics().await,
        }
    }

    /// Raw manager status page body.
    pub async fn fetch_status(&self) -> Result<Vec<u8>> {
        let url = self.status_url();
        let request = self.http.get(&url).basic_auth(
            &self.config.user,
            Some(self.config.password.expose_secret()),
        );
        self.send(request, url).await
    }

    /// Raw Jolokia read body.
    pub async fn fetch_jolokia(&self, mbean: &str) -> Result<Vec<u8>> {
        let url = self.jolokia_url(mbean);
        let request = self.http.get(&url);
        self.send(request, url).await
    }

    async fn fetch_manager_metrics(&self) -> Result<MetricMap> {
        let body = self.fetch_status().await?;
        let report = decode_status(&body)?;
        Ok(normalize_status(&report))
    }

    async fn fetch_jolokia_metrics(&self) -> Result<MetricMap> {
        let mut metrics = MetricMap::new();

        for attribute in THREAD_POOL_ATTRIBUTES {
            let body = self
                .fetch_jolokia(&format!("{THREAD_POOL_MBEAN}/{attribute}"))
                .await?;
            let response = decode_jolokia::<ThreadPoolEntry>(&body)?;
            merge_thread_pool(&mut metrics, attribute, &response)?;
        }

        let body = self.fetch_jolokia(REQUEST_PROCESSOR_MBEAN).await?;
        let response = decode_jolokia::<RequestProcessorStats>(&body)?;
        merge_request_processor(&mut metrics, &response);

        Ok(metrics)
    }

    async fn send(&self, request: RequestBuilder, url: String) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("{} returned {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}

fn absolute_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
