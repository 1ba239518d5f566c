//! Agent Plugin Output
//!
//! One-shot mode for host monitoring agents that run the binary on their own
//! schedule and read its stdout.
//!
//! # Formats
//!
//! - **Values**: one `<prefix>.<graph>.<metric>\t<value>\t<epoch seconds>` line
//!   per metric, e.g. `tomcat.thread.http.currentThreadsBusy\t1\t1700000000`
//! - **Definitions**: when the agent asks for metadata, a
//!   `# mackerel-agent-plugin` header line followed by the graph catalog as
//!   JSON (`{"graphs": {"<prefix>.<graph key>": {...}}}`)
//!
//! Cumulative counters are printed as read. Differencing consecutive samples
//! and remembering the previous one is left to the agent, guided by the
//! `diff` flag in the definitions.

use crate::config::Config;
use crate::tomcat::catalog::{self, GraphDefinition};
use crate::tomcat::{effective_prefix, graph_definitions, MetricMap, TomcatClient};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

pub const META_HEADER: &str = "# mackerel-agent-plugin";

/// Render a metric map as plugin value lines.
///
/// Keys that belong to no graph are skipped.
pub fn render_values(
    prefix: &str,
    graphs: &[GraphDefinition],
    metrics: &MetricMap,
    timestamp: u64,
) -> String {
    let mut out = String::new();
    for (key, value) in metrics {
        match catalog::resolve(graphs, key) {
            Some(resolved) => {
                let _ = writeln!(
                    out,
                    "{prefix}.{}.{}\t{value}\t{timestamp}",
                    resolved.graph, resolved.metric.name
                );
            }
            None => debug!("No graph for metric {}, skipping", key),
        }
    }
    out
}

/// Render the graph catalog as plugin metadata.
pub fn render_definitions(prefix: &str, graphs: &[GraphDefinition]) -> Result<String> {
    let graphs: BTreeMap<String, &GraphDefinition> = graphs
        .iter()
        .map(|graph| (format!("{prefix}.{}", graph.key), graph))
        .collect();
    let json = serde_json::to_string(&serde_json::json!({ "graphs": graphs }))
        .context("Failed to serialize graph definitions")?;
    Ok(format!("{META_HEADER}\n{json}\n"))
}

/// Run one plugin invocation and return what should be written to stdout.
pub async fn run_once(config: &Config, meta: bool) -> Result<String> {
    let prefix = effective_prefix(config.metrics.metric_key_prefix.as_deref());
    let graphs = graph_definitions(prefix);

    if meta {
        return render_definitions(prefix, &graphs);
    }

    let client = TomcatClient::new(config.tomcat.clone())?;
    let metrics = client
        .fetch_metrics()
        .await
        .with_context(|| format!("Failed to fetch metrics from {}", config.tomcat.base_url()))?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    Ok(render_values(prefix, &graphs, &metrics, now))
}
