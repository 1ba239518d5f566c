//! Tomcat Status Type Definitions
//!
//! Typed intermediate representation of both upstream response shapes.
//!
//! # Manager status page (`/manager/status/all?XML=true`)
//!
//! - [`StatusReport`] - the `<status>` document
//! - [`JvmMemory`] - the `jvm/memory` element
//! - [`ConnectorStatus`] - one `<connector>` with its [`ThreadInfo`] and [`RequestInfo`]
//!
//! The markup is read by [`decode_status`](crate::tomcat::decode::decode_status);
//! these structs carry no serde derives.
//!
//! # Jolokia (`/jolokia/read/<mbean>`)
//!
//! - [`JolokiaResponse`] - response envelope, generic over the per-mbean entry
//! - [`ThreadPoolEntry`] - `Catalina:name=*,type=ThreadPool/<attribute>` entries
//! - [`RequestProcessorStats`] - `Catalina:name=*,type=GlobalRequestProcessor` entries
//!
//! # Design Notes
//!
//! - **Typed per category**: each mbean category gets its own entry type so a
//!   response of the wrong shape fails at decode time.
//! - **Floats**: every counter is an `f64`; Tomcat reports integers but the
//!   metric map is floating-point throughout.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Decoded manager status document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusReport {
    pub memory: JvmMemory,
    pub connectors: Vec<ConnectorStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JvmMemory {
    pub free: f64,
    pub total: f64,
    pub max: f64,
}

/// One network listener as reported by the status page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectorStatus {
    /// Name exactly as it appears in the `name` attribute, quotes included
    /// (e.g. `"http-nio-8080"`).
    pub raw_name: String,
    pub thread_info: ThreadInfo,
    pub request_info: RequestInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThreadInfo {
    pub max_threads: f64,
    pub current_thread_count: f64,
    pub current_threads_busy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub max_time: f64,
    pub processing_time: f64,
    pub request_count: f64,
    pub error_count: f64,
    pub bytes_received: f64,
    pub bytes_sent: f64,
}

/// Jolokia read response.
///
/// `value` is keyed by the composite mbean name, e.g.
/// `Catalina:name="http-nio-8080",type=ThreadPool`. Error responses carry
/// `status`/`error` and no `value`; those are rejected before this type is
/// decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct JolokiaResponse<T> {
    #[serde(default)]
    pub request: Option<JolokiaRequest>,
    pub value: BTreeMap<String, T>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub timestamp: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The query echoed back by Jolokia.
#[derive(Debug, Clone, Deserialize)]
pub struct JolokiaRequest {
    pub mbean: String,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A single-attribute ThreadPool entry, e.g. `{"currentThreadsBusy": 1}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ThreadPoolEntry(pub HashMap<String, f64>);

impl ThreadPoolEntry {
    pub fn get(&self, attribute: &str) -> Option<f64> {
        self.0.get(attribute).copied()
    }
}

/// GlobalRequestProcessor entry. Extra fields such as `modelerType` are ignored.
pub type RequestProcessorStats = RequestInfo;

/// ThreadPool attributes Jolokia is queried for, one request each.
pub const THREAD_POOL_ATTRIBUTES: [&str; 3] =
    ["maxThreads", "currentThreadCount", "currentThreadsBusy"];

pub const THREAD_POOL_MBEAN: &str = "Catalina:name=*,type=ThreadPool";
pub const REQUEST_PROCESSOR_MBEAN: &str = "Catalina:name=*,type=GlobalRequestProcessor";
