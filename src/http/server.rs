//! Operational HTTP endpoints.
//!
//! # Responsibilities
//! - `/health`: liveness of the process itself
//! - `/ready`: readiness once every watchdog is running
//! - `/metrics`: Prometheus exposition
//!
//! # Design Decisions
//! - Served on its own listener, separate from anything being monitored
//! - Shuts down with the rest of the process on the shutdown signal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

/// State shared by the ops handlers.
#[derive(Clone)]
pub struct OpsState {
    ready: Arc<AtomicBool>,
    metrics: Option<PrometheusHandle>,
}

impl OpsState {
    pub fn new(ready: Arc<AtomicBool>, metrics: Option<PrometheusHandle>) -> Self {
        Self { ready, metrics }
    }
}

/// HTTP server for the ops endpoints.
pub struct OpsServer {
    router: Router,
}

impl OpsServer {
    pub fn new(state: OpsState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: OpsState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/metrics", get(metrics))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Ops server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Ops server stopped");
        Ok(())
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn ready(State(state): State<OpsState>) -> StatusCode {
    if state.ready.load(Ordering::Acquire) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(State(state): State<OpsState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}
