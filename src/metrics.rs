//! Prometheus Metrics Definitions
//!
//! Maps each cycle's [`MetricMap`] onto Prometheus gauge families derived from
//! the [graph catalog](crate::tomcat::catalog), one family per graph group:
//!
//! - `<ns>_jvm_memory{metric}` - JVM heap in bytes (`free`, `used`, `total`, `max`)
//! - `<ns>_thread{protocol,metric}` - connector thread pool sizes
//! - `<ns>_request_processing_time{protocol,metric}` - milliseconds
//! - `<ns>_request_count{protocol,metric}` - request and error counters
//! - `<ns>_request_byte{protocol,metric}` - bytes received and sent
//!
//! plus `<ns>_up` and `<ns>_scrape_duration_seconds` for the collection loop.
//!
//! Counters are exported as gauges holding the value Tomcat reports; they only
//! reset when Tomcat restarts. `<ns>` is the metric key prefix, `tomcat` by
//! default.

use crate::tomcat::catalog::{GraphDefinition, Unit, WILDCARD};
use crate::tomcat::MetricMap;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tracing::debug;

/// One gauge family per graph group.
struct GraphFamily {
    definition: GraphDefinition,
    gauge: GaugeVec,
}

/// Metrics collector for Tomcat
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,
    families: Arc<Vec<GraphFamily>>,
    pub up: Arc<Gauge>,
    pub scrape_duration_seconds: Arc<Gauge>,
}

impl MetricsCollector {
    pub fn new(namespace: &str, graphs: &[GraphDefinition]) -> anyhow::Result<Self> {
        let registry = Registry::new();
        let namespace = sanitize(namespace);

        let mut families = Vec::with_capacity(graphs.len());
        for definition in graphs {
            let labels: &[&str] = if definition.has_wildcard() {
                &["protocol", "metric"]
            } else {
                &["metric"]
            };
            let gauge = GaugeVec::new(
                Opts::new(family_name(definition.key), family_help(definition))
                    .namespace(namespace.clone()),
                labels,
            )?;
            registry.register(Box::new(gauge.clone()))?;
            families.push(GraphFamily {
                definition: definition.clone(),
                gauge,
            });
        }

        let up = Gauge::with_opts(
            Opts::new("up", "Whether the last collection from Tomcat succeeded (1=yes, 0=no)")
                .namespace(namespace.clone()),
        )?;
        let scrape_duration_seconds = Gauge::with_opts(
            Opts::new(
                "scrape_duration_seconds",
                "Duration of the last collection from Tomcat",
            )
            .namespace(namespace),
        )?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(scrape_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            families: Arc::new(families),
            up: Arc::new(up),
            scrape_duration_seconds: Arc::new(scrape_duration_seconds),
        })
    }

    /// Replace the exported values with one cycle's metric map.
    ///
    /// Series for protocols absent from `metrics` disappear.
    pub fn record(&self, metrics: &MetricMap) {
        self.reset();

        for (key, value) in metrics {
            let resolved = self.families.iter().find_map(|family| {
                family
                    .definition
                    .resolve(key)
                    .map(|resolved| (family, resolved))
            });

            match resolved {
                Some((family, resolved)) => match resolved.instance {
                    Some(protocol) => family
                        .gauge
                        .with_label_values(&[protocol, resolved.metric.name])
                        .set(*value),
                    None => family
                        .gauge
                        .with_label_values(&[resolved.metric.name])
                        .set(*value),
                },
                None => debug!("No Prometheus family for metric {}", key),
            }
        }
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Drop every per-graph series. `up` and the scrape duration are kept.
    pub fn reset(&self) {
        for family in self.families.iter() {
            family.gauge.reset();
        }
    }
}

/// `request.count.#` -> `request_count`
fn family_name(graph_key: &str) -> String {
    graph_key
        .split('.')
        .filter(|segment| *segment != WILDCARD)
        .collect::<Vec<_>>()
        .join("_")
}

fn family_help(definition: &GraphDefinition) -> String {
    let unit = match definition.unit {
        Unit::Bytes => "bytes",
        Unit::Integer => "count",
    };
    format!("{} ({})", definition.label, unit)
}

/// Prometheus names allow `[a-zA-Z0-9_]` only.
fn sanitize(namespace: &str) -> String {
    namespace
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
