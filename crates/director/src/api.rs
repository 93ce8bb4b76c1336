//! HTTP surface of the director: liveness, status, and metrics.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use lodestone_core::{metrics, Director, DirectorStatus};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn create_router(director: Arc<Director>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/status", get(status))
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(director)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn status(State(director): State<Arc<Director>>) -> Json<DirectorStatus> {
    Json(director.status())
}

async fn render_metrics() -> String {
    metrics::render()
}
