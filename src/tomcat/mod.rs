pub mod catalog;
pub mod client;
pub mod decode;
pub mod normalize;
pub mod types;

pub use catalog::{effective_prefix, graph_definitions, GraphDefinition};
pub use client::TomcatClient;
pub use normalize::MetricMap;
