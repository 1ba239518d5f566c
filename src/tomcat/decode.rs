//! Response Decoding
//!
//! Turns raw response bodies into the typed representation in
//! [`types`](crate::tomcat::types).
//!
//! # Failure classes
//!
//! - [`ExporterError::Decode`] - the body is not a well-formed document of the
//!   expected syntax (bad XML, bad JSON, truncated input, no `<status>` root)
//! - [`ExporterError::ShapeMismatch`] - the document is well-formed but lacks a
//!   required element or attribute, or a value is not numeric
//! - [`ExporterError::Jolokia`] - Jolokia answered with an error status in the body

use crate::error::{ExporterError, Result};
use crate::tomcat::types::{
    ConnectorStatus, JolokiaResponse, JvmMemory, RequestInfo, StatusReport, ThreadInfo,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const ROOT: &str = "status";

/// Decode a manager status page (`?XML=true`) body.
///
/// Elements outside the schema (`memorypool`, `workers`, `worker`, ...) are
/// skipped, so newer Tomcat releases adding siblings still decode.
pub fn decode_status(bytes: &[u8]) -> Result<StatusReport> {
    let mut reader = Reader::from_reader(bytes);
    let mut builder = StatusBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => builder.open(&e)?,
            Event::Empty(e) => {
                builder.open(&e)?;
                builder.close()?;
            }
            Event::End(_) => builder.close()?,
            Event::Eof => break,
            _ => {}
        }
        if builder.finished {
            break;
        }
    }

    builder.finish()
}

#[derive(Default)]
struct StatusBuilder {
    path: Vec<String>,
    seen_root: bool,
    finished: bool,
    memory: Option<JvmMemory>,
    connectors: Vec<ConnectorStatus>,
    connector: Option<PartialConnector>,
}

struct PartialConnector {
    raw_name: String,
    thread_info: Option<ThreadInfo>,
    request_info: Option<RequestInfo>,
}

impl StatusBuilder {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

        match (self.path.len(), name.as_str()) {
            (0, ROOT) => self.seen_root = true,
            (0, other) => {
                return Err(ExporterError::ShapeMismatch(format!(
                    "expected <{ROOT}> root element, found <{other}>"
                )))
            }
            (2, "memory") if self.path[1] == "jvm" => {
                let attrs = attributes(e)?;
                self.memory = Some(JvmMemory {
                    free: number(&attrs, "memory", "free")?,
                    total: number(&attrs, "memory", "total")?,
                    max: number(&attrs, "memory", "max")?,
                });
            }
            (1, "connector") => {
                let attrs = attributes(e)?;
                let raw_name = attrs.get("name").cloned().ok_or_else(|| {
                    ExporterError::ShapeMismatch(
                        "<connector> is missing the name attribute".to_string(),
                    )
                })?;
                self.connector = Some(PartialConnector {
                    raw_name,
                    thread_info: None,
                    request_info: None,
                });
            }
            (2, "threadInfo") if self.path[1] == "connector" => {
                let attrs = attributes(e)?;
                if let Some(connector) = self.connector.as_mut() {
                    connector.thread_info = Some(ThreadInfo {
                        max_threads: number(&attrs, "threadInfo", "maxThreads")?,
                        current_thread_count: number(&attrs, "threadInfo", "currentThreadCount")?,
                        current_threads_busy: number(&attrs, "threadInfo", "currentThreadsBusy")?,
                    });
                }
            }
            (2, "requestInfo") if self.path[1] == "connector" => {
                let attrs = attributes(e)?;
                if let Some(connector) = self.connector.as_mut() {
                    connector.request_info = Some(RequestInfo {
                        max_time: number(&attrs, "requestInfo", "maxTime")?,
                        processing_time: number(&attrs, "requestInfo", "processingTime")?,
                        request_count: number(&attrs, "requestInfo", "requestCount")?,
                        error_count: number(&attrs, "requestInfo", "errorCount")?,
                        bytes_received: number(&attrs, "requestInfo", "bytesReceived")?,
                        bytes_sent: number(&attrs, "requestInfo", "bytesSent")?,
                    });
                }
            }
            _ => {}
        }

        self.path.push(name);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let name = self.path.pop().ok_or_else(|| {
            ExporterError::Decode("closing tag without a matching opening tag".to_string())
        })?;

        match (self.path.len(), name.as_str()) {
            (0, _) => self.finished = true,
            (1, "connector") => {
                if let Some(partial) = self.connector.take() {
                    self.connectors.push(partial.complete()?);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<StatusReport> {
        if !self.seen_root {
            return Err(ExporterError::Decode(format!(
                "no <{ROOT}> element found in response body"
            )));
        }
        if let Some(open) = self.path.last() {
            return Err(ExporterError::Decode(format!(
                "document ended inside <{open}>"
            )));
        }

        let memory = self.memory.ok_or_else(|| {
            ExporterError::ShapeMismatch("status report has no <jvm><memory> element".to_string())
        })?;

        debug!("Decoded status report with {} connectors", self.connectors.len());
        Ok(StatusReport {
            memory,
            connectors: self.connectors,
        })
    }
}

impl PartialConnector {
    fn complete(self) -> Result<ConnectorStatus> {
        let missing = |element: &str| {
            ExporterError::ShapeMismatch(format!(
                "connector {} has no <{element}> element",
                self.raw_name
            ))
        };
        let thread_info = self.thread_info.ok_or_else(|| missing("threadInfo"))?;
        let request_info = self.request_info.ok_or_else(|| missing("requestInfo"))?;

        Ok(ConnectorStatus {
            raw_name: self.raw_name,
            thread_info,
            request_info,
        })
    }
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn number(attrs: &HashMap<String, String>, element: &str, name: &str) -> Result<f64> {
    let raw = attrs.get(name).ok_or_else(|| {
        ExporterError::ShapeMismatch(format!("<{element}> is missing the {name} attribute"))
    })?;
    raw.trim().parse::<f64>().map_err(|_| {
        ExporterError::ShapeMismatch(format!("<{element}> {name}={raw:?} is not a number"))
    })
}

/// Fields every Jolokia response carries, read before the typed payload.
#[derive(Deserialize)]
struct JolokiaEnvelope {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode a Jolokia read response whose entries are of type `T`.
pub fn decode_jolokia<T: DeserializeOwned>(bytes: &[u8]) -> Result<JolokiaResponse<T>> {
    let envelope: JolokiaEnvelope = serde_json::from_slice(bytes)?;
    if let Some(status) = envelope.status.filter(|status| *status != 200) {
        return Err(ExporterError::Jolokia {
            status,
            message: envelope
                .error
                .unwrap_or_else(|| "no error message".to_string()),
        });
    }

    let response: JolokiaResponse<T> = serde_json::from_slice(bytes)?;
    debug!("Decoded Jolokia response with {} entries", response.value.len());
    Ok(response)
}
