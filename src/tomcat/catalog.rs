//! Graph Catalog
//!
//! Static description of the five graph groups built from the metric map,
//! the labels and units they are displayed with, and which metrics are
//! cumulative counters the host must difference.
//!
//! Group keys may contain the `#` wildcard segment: one concrete graph per
//! protocol name seen at runtime (`thread.#` becomes `thread.http`,
//! `thread.ajp`, ...). The catalog itself never names a protocol.

use serde::Serialize;

pub const DEFAULT_PREFIX: &str = "tomcat";

/// Wildcard segment in a graph key.
pub const WILDCARD: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Bytes,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    /// Cumulative counter; the host reports the difference between samples.
    pub diff: bool,
    pub stacked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDefinition {
    #[serde(skip)]
    pub key: &'static str,
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<MetricDescriptor>,
}

/// A metric key resolved against a graph definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetric<'a> {
    /// Graph key with the wildcard replaced, e.g. `request.count.http`.
    pub graph: String,
    /// The protocol matched by the wildcard, if the graph has one.
    pub instance: Option<&'a str>,
    pub metric: &'a MetricDescriptor,
}

const fn gauge(name: &'static str, label: &'static str) -> MetricDescriptor {
    MetricDescriptor {
        name,
        label,
        diff: false,
        stacked: false,
    }
}

const fn counter(name: &'static str, label: &'static str) -> MetricDescriptor {
    MetricDescriptor {
        name,
        label,
        diff: true,
        stacked: false,
    }
}

const fn stacked(name: &'static str, label: &'static str) -> MetricDescriptor {
    MetricDescriptor {
        name,
        label,
        diff: false,
        stacked: true,
    }
}

type GroupSpec = (&'static str, &'static str, Unit, &'static [MetricDescriptor]);

const GROUPS: [GroupSpec; 5] = [
    (
        "jvm.memory",
        "Jvm Memory",
        Unit::Bytes,
        &[
            stacked("free", "free"),
            stacked("used", "used"),
            gauge("total", "total"),
            gauge("max", "max"),
        ],
    ),
    (
        "thread.#",
        "Threads",
        Unit::Integer,
        &[
            gauge("maxThreads", "max"),
            gauge("currentThreadCount", "current"),
            gauge("currentThreadsBusy", "busy"),
        ],
    ),
    (
        "request.processing_time.#",
        "Request Processing Time",
        Unit::Integer,
        &[gauge("maxTime", "max"), counter("processingTime", "processing")],
    ),
    (
        "request.count.#",
        "Request Counts",
        Unit::Integer,
        &[counter("requestCount", "request"), counter("errorCount", "error")],
    ),
    (
        "request.byte.#",
        "Request Bytes",
        Unit::Bytes,
        &[counter("bytesReceived", "received"), counter("bytesSent", "sent")],
    ),
];

/// The prefix metric keys are published under: the configured value, or
/// [`DEFAULT_PREFIX`] when unset or blank.
pub fn effective_prefix(configured: Option<&str>) -> &str {
    match configured.map(str::trim) {
        Some(prefix) if !prefix.is_empty() => prefix,
        _ => DEFAULT_PREFIX,
    }
}

/// Upper-cases the first letter of every word, `"tomcat"` -> `"Tomcat"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = !c.is_alphanumeric();
    }
    out
}

/// All graph definitions, in display order, labelled with `prefix`.
pub fn graph_definitions(prefix: &str) -> Vec<GraphDefinition> {
    let label_prefix = title_case(prefix);
    GROUPS
        .iter()
        .map(|(key, label, unit, metrics)| GraphDefinition {
            key: *key,
            label: format!("{label_prefix} {label}"),
            unit: *unit,
            metrics: metrics.to_vec(),
        })
        .collect()
}

impl GraphDefinition {
    pub fn has_wildcard(&self) -> bool {
        self.key.split('.').any(|segment| segment == WILDCARD)
    }

    /// Match a metric-map key against this graph.
    ///
    /// Plain graphs own their metrics by bare name (`free`), wildcard graphs by
    /// the expanded key (`thread.<protocol>.maxThreads`), mirroring how the
    /// normalizer writes them.
    pub fn resolve<'a>(&'a self, key: &'a str) -> Option<ResolvedMetric<'a>> {
        if !self.has_wildcard() {
            let metric = self.metrics.iter().find(|m| m.name == key)?;
            return Some(ResolvedMetric {
                graph: self.key.to_string(),
                instance: None,
                metric,
            });
        }

        let (graph_part, metric_name) = key.rsplit_once('.')?;
        let metric = self.metrics.iter().find(|m| m.name == metric_name)?;

        let pattern: Vec<&str> = self.key.split('.').collect();
        let segments: Vec<&str> = graph_part.split('.').collect();
        if pattern.len() != segments.len() {
            return None;
        }

        let mut instance = None;
        for (expected, actual) in pattern.iter().zip(&segments) {
            if *expected == WILDCARD {
                if !is_instance_segment(actual) {
                    return None;
                }
                instance = Some(*actual);
            } else if expected != actual {
                return None;
            }
        }

        Some(ResolvedMetric {
            graph: graph_part.to_string(),
            instance,
            metric,
        })
    }
}

/// Find the graph and descriptor a metric-map key belongs to.
pub fn resolve<'a>(graphs: &'a [GraphDefinition], key: &'a str) -> Option<ResolvedMetric<'a>> {
    graphs.iter().find_map(|graph| graph.resolve(key))
}

fn is_instance_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
