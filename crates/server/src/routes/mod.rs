//! Handlers: `health` for the probe, `analysis` for everything that runs
//! the detector.

pub mod analysis;
pub mod health;

use axum::Json;
use serde::Serialize;

use crate::error::ServerError;

const ENDPOINTS: [&str; 4] = [
    "/api/v1/analyze",
    "/api/v1/compare",
    "/api/v1/report",
    "/health",
];

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub api_version: &'static str,
    pub endpoints: [&'static str; 4],
}

/// `GET /`
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "Plagio Server",
        version: env!("CARGO_PKG_VERSION"),
        api_version: "v1",
        endpoints: ENDPOINTS,
    })
}

pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
