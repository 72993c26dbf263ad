use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::{ServerMetadata, ServerState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub server: ServerMetadata,
}

/// Liveness probe. Never touches the detector or the remote source.
pub async fn health_check(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "plagio-server",
        timestamp: chrono::Utc::now().to_rfc3339(),
        server: state.metadata(),
    })
}
