//! Metric Normalization
//!
//! Flattens decoded documents into a [`MetricMap`] keyed by the dotted names
//! the [graph catalog](crate::tomcat::catalog) refers to:
//!
//! - `free`, `total`, `max`, `used` - JVM heap
//! - `thread.<protocol>.{maxThreads,currentThreadCount,currentThreadsBusy}`
//! - `request.processing_time.<protocol>.{maxTime,processingTime}`
//! - `request.count.<protocol>.{requestCount,errorCount}`
//! - `request.byte.<protocol>.{bytesReceived,bytesSent}`
//!
//! `<protocol>` is the leading segment of the connector name
//! (`"http-nio-8080"` -> `http`). Two connectors sharing a protocol write the
//! same keys; the later one wins and a warning is logged.

use crate::error::{ExporterError, Result};
use crate::tomcat::types::{
    JolokiaResponse, RequestInfo, RequestProcessorStats, StatusReport, ThreadInfo,
    ThreadPoolEntry,
};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Metric name to value for one fetch cycle.
pub type MetricMap = BTreeMap<String, f64>;

/// Protocol name of a connector as named on the status page.
///
/// Surrounding double quotes are stripped and the text before the first `-`
/// is returned. Names without that structure are used verbatim; an empty
/// leading segment (`"-nio-8080"`) counts as no structure and yields
/// `-nio-8080`, not an empty protocol.
pub fn protocol_name(raw_name: &str) -> String {
    let name = raw_name.trim().trim_matches('"');
    match name.split_once('-') {
        Some((protocol, _)) if !protocol.is_empty() => protocol.to_string(),
        _ => {
            warn!(
                connector = raw_name,
                "Connector name is not protocol-transport-port, using it verbatim"
            );
            name.to_string()
        }
    }
}

/// Protocol name embedded in a Jolokia mbean key such as
/// `Catalina:name="ajp-nio-8009",type=ThreadPool`.
pub fn protocol_from_mbean(key: &str) -> String {
    if let Some(quoted) = key.split('"').nth(1) {
        return protocol_name(quoted);
    }

    warn!(mbean = key, "Mbean name carries no quoted connector name");
    let properties = key.split_once(':').map_or(key, |(_, props)| props);
    let name = properties
        .split(',')
        .find_map(|prop| prop.strip_prefix("name="))
        .unwrap_or(key);
    protocol_name(name)
}

/// Normalize a manager status report.
pub fn normalize_status(report: &StatusReport) -> MetricMap {
    let mut metrics = MetricMap::new();

    let memory = &report.memory;
    metrics.insert("free".to_string(), memory.free);
    metrics.insert("total".to_string(), memory.total);
    metrics.insert("max".to_string(), memory.max);
    // Raw subtraction: a report with free > total surfaces as negative usage.
    metrics.insert("used".to_string(), memory.total - memory.free);

    let mut seen = HashSet::new();
    for connector in &report.connectors {
        let protocol = protocol_name(&connector.raw_name);
        note_protocol(&mut seen, &protocol, &connector.raw_name);

        insert_thread_info(&mut metrics, &protocol, &connector.thread_info);
        insert_request_info(&mut metrics, &protocol, &connector.request_info);
    }

    metrics
}

/// Merge one `ThreadPool/<attribute>` response into `metrics`.
///
/// Only `thread.<protocol>.<attribute>` keys are written; everything else in
/// the map is left as is.
pub fn merge_thread_pool(
    metrics: &mut MetricMap,
    attribute: &str,
    response: &JolokiaResponse<ThreadPoolEntry>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for (mbean, entry) in &response.value {
        let value = entry.get(attribute).ok_or_else(|| {
            ExporterError::ShapeMismatch(format!("{mbean} has no numeric {attribute} attribute"))
        })?;
        let protocol = protocol_from_mbean(mbean);
        note_protocol(&mut seen, &protocol, mbean);

        metrics.insert(format!("thread.{protocol}.{attribute}"), value);
    }
    Ok(())
}

/// Merge a `GlobalRequestProcessor` response into `metrics`.
pub fn merge_request_processor(
    metrics: &mut MetricMap,
    response: &JolokiaResponse<RequestProcessorStats>,
) {
    let mut seen = HashSet::new();
    for (mbean, stats) in &response.value {
        let protocol = protocol_from_mbean(mbean);
        note_protocol(&mut seen, &protocol, mbean);

        insert_request_info(metrics, &protocol, stats);
    }
}

fn insert_thread_info(metrics: &mut MetricMap, protocol: &str, info: &ThreadInfo) {
    let thread = |name: &str| format!("thread.{protocol}.{name}");
    metrics.insert(thread("maxThreads"), info.max_threads);
    metrics.insert(thread("currentThreadCount"), info.current_thread_count);
    metrics.insert(thread("currentThreadsBusy"), info.current_threads_busy);
}

fn insert_request_info(metrics: &mut MetricMap, protocol: &str, info: &RequestInfo) {
    let key = |group: &str, name: &str| format!("request.{group}.{protocol}.{name}");

    // processing time
    metrics.insert(key("processing_time", "maxTime"), info.max_time);
    metrics.insert(key("processing_time", "processingTime"), info.processing_time);
    // request count
    metrics.insert(key("count", "requestCount"), info.request_count);
    metrics.insert(key("count", "errorCount"), info.error_count);
    // request byte
    metrics.insert(key("byte", "bytesReceived"), info.bytes_received);
    metrics.insert(key("byte", "bytesSent"), info.bytes_sent);
}

fn note_protocol(seen: &mut HashSet<String>, protocol: &str, source: &str) {
    if !seen.insert(protocol.to_string()) {
        warn!(
            protocol,
            source, "Several connectors map to the same protocol, keeping the last one"
        );
    }
}
