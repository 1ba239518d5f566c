//! HTTP Server and Metrics Collection
//!
//! Exporter mode: an axum server plus a background loop that polls Tomcat.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to the other endpoints
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - 200 if the last collection succeeded, 503 otherwise
//! - `GET /graphs` - the graph catalog as JSON
//!
//! # Metrics Collection
//!
//! Every `scrape_interval_seconds` the loop runs one fetch cycle. A failed
//! cycle is logged, clears the per-graph series and sets `<ns>_up` to 0; the
//! loop itself keeps running.

use crate::config::Config;
use crate::error::ExporterError;
use crate::metrics::MetricsCollector;
use crate::tomcat::{effective_prefix, graph_definitions, GraphDefinition, TomcatClient};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, Duration};
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    config: Config,
    metrics: MetricsCollector,
    client: Arc<TomcatClient>,
    prefix: String,
    graphs: Arc<Vec<GraphDefinition>>,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let prefix = effective_prefix(config.metrics.metric_key_prefix.as_deref()).to_string();
    let graphs = Arc::new(graph_definitions(&prefix));
    let metrics = MetricsCollector::new(&prefix, &graphs)?;
    let client = Arc::new(TomcatClient::new(config.tomcat.clone())?);

    let state = AppState {
        config: config.clone(),
        metrics,
        client,
        prefix,
        graphs,
    };

    // Start background metrics collection
    let collection_state = state.clone();
    tokio::spawn(async move {
        collect_metrics_loop(collection_state).await;
    });

    // Build the router
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/graphs", get(graphs_handler))
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("failed to bind {addr}: {e}")))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ExporterError::Server(e.to_string()))?;

    Ok(())
}

async fn collect_metrics_loop(state: AppState) {
    let mut ticker = interval(Duration::from_secs(
        state.config.metrics.scrape_interval_seconds.max(1),
    ));

    loop {
        ticker.tick().await;
        collect_metrics(&state).await;
    }
}

async fn collect_metrics(state: &AppState) {
    info!("Collecting metrics from Tomcat ({:?} mode)", state.client.mode());
    let started = Instant::now();

    match state.client.fetch_metrics().await {
        Ok(metrics) => {
            state.metrics.record(&metrics);
            state.metrics.up.set(1.0);
            info!("Updated {} metrics", metrics.len());
        }
        Err(e) => {
            error!("Failed to collect metrics: {}", e);
            state.metrics.reset();
            state.metrics.up.set(0.0);
        }
    }

    state
        .metrics
        .scrape_duration_seconds
        .set(started.elapsed().as_secs_f64());
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Tomcat Exporter</title></head>
<body>
<h1>Tomcat Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
<p><a href="/graphs">Graph definitions</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let up_value = state.metrics.up.get();

    if up_value > 0.0 {
        (axum::http::StatusCode::OK, "OK")
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Tomcat status endpoint unreachable",
        )
    }
}

async fn graphs_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, GraphDefinition>> {
    let graphs = state
        .graphs
        .iter()
        .map(|graph| (format!("{}.{}", state.prefix, graph.key), graph.clone()))
        .collect();
    Json(graphs)
}
