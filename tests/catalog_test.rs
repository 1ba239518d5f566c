//! Graph catalog tests

use tomcat_exporter::tomcat::catalog::{
    effective_prefix, graph_definitions, resolve, title_case, Unit, DEFAULT_PREFIX,
};

#[test]
fn test_effective_prefix_defaults_to_tomcat() {
    assert_eq!(effective_prefix(None), DEFAULT_PREFIX);
    assert_eq!(effective_prefix(Some("")), "tomcat");
    assert_eq!(effective_prefix(Some("   ")), "tomcat");
    assert_eq!(effective_prefix(Some("catalina")), "catalina");
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("tomcat"), "Tomcat");
    assert_eq!(title_case("my tomcat"), "My Tomcat");
    assert_eq!(title_case("app-server"), "App-Server");
    assert_eq!(title_case(""), "");
}

#[test]
fn test_catalog_declares_five_groups_in_order() {
    // Given: The default prefix
    // When: Building the catalog
    let graphs = graph_definitions("tomcat");

    // Then: The five groups are declared with their labels and units
    let keys: Vec<&str> = graphs.iter().map(|g| g.key).collect();
    assert_eq!(
        keys,
        vec![
            "jvm.memory",
            "thread.#",
            "request.processing_time.#",
            "request.count.#",
            "request.byte.#",
        ]
    );
    assert_eq!(graphs[0].label, "Tomcat Jvm Memory");
    assert_eq!(graphs[0].unit, Unit::Bytes);
    assert_eq!(graphs[1].label, "Tomcat Threads");
    assert_eq!(graphs[1].unit, Unit::Integer);
    assert_eq!(graphs[2].label, "Tomcat Request Processing Time");
    assert_eq!(graphs[3].label, "Tomcat Request Counts");
    assert_eq!(graphs[4].label, "Tomcat Request Bytes");
    assert_eq!(graphs[4].unit, Unit::Bytes);
}

#[test]
fn test_catalog_marks_cumulative_counters() {
    let graphs = graph_definitions("tomcat");

    let diff: Vec<&str> = graphs
        .iter()
        .flat_map(|g| g.metrics.iter())
        .filter(|m| m.diff)
        .map(|m| m.name)
        .collect();

    assert_eq!(
        diff,
        vec![
            "processingTime",
            "requestCount",
            "errorCount",
            "bytesReceived",
            "bytesSent",
        ]
    );
}

#[test]
fn test_memory_graph_stacks_free_and_used() {
    let graphs = graph_definitions("tomcat");
    let stacked: Vec<&str> = graphs[0]
        .metrics
        .iter()
        .filter(|m| m.stacked)
        .map(|m| m.name)
        .collect();
    assert_eq!(stacked, vec!["free", "used"]);
}

#[test]
fn test_label_uses_configured_prefix() {
    let graphs = graph_definitions("catalina");
    assert!(graphs.iter().all(|g| g.label.starts_with("Catalina ")));
}

#[test]
fn test_resolve_plain_metric() {
    let graphs = graph_definitions("tomcat");

    let resolved = resolve(&graphs, "used").expect("used should resolve");

    assert_eq!(resolved.graph, "jvm.memory");
    assert_eq!(resolved.instance, None);
    assert_eq!(resolved.metric.name, "used");
}

#[test]
fn test_resolve_wildcard_metric() {
    let graphs = graph_definitions("tomcat");

    let resolved =
        resolve(&graphs, "request.processing_time.http.processingTime").expect("should resolve");

    assert_eq!(resolved.graph, "request.processing_time.http");
    assert_eq!(resolved.instance, Some("http"));
    assert!(resolved.metric.diff);
}

#[test]
fn test_resolve_rejects_unknown_keys() {
    let graphs = graph_definitions("tomcat");

    assert!(resolve(&graphs, "thread.http.unknownAttribute").is_none());
    assert!(resolve(&graphs, "thread.maxThreads").is_none());
    assert!(resolve(&graphs, "thread.a.b.maxThreads").is_none());
    assert!(resolve(&graphs, "request.count.h\"x.requestCount").is_none());
    assert!(resolve(&graphs, "maxThreads").is_none());
}

#[test]
fn test_catalog_serializes_units_lowercase() {
    let graphs = graph_definitions("tomcat");
    let json = serde_json::to_value(&graphs[0]).expect("serialize");

    assert_eq!(json["unit"], "bytes");
    assert_eq!(json["label"], "Tomcat Jvm Memory");
    assert_eq!(json["metrics"][0]["name"], "free");
    assert_eq!(json["metrics"][0]["stacked"], true);
    assert!(json.get("key").is_none());
}
