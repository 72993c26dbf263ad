//! Router assembly, listener setup and graceful shutdown.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{analysis, api_info, health, not_found};
use crate::state::ServerState;

/// Analysis endpoints, mounted under `/api/v1`. Only these carry the body
/// limit; the probes take no body.
fn analysis_routes(max_body: usize) -> Router<Arc<ServerState>> {
    Router::new()
        .route("/analyze", post(analysis::analyze_documents))
        .route("/compare", post(analysis::compare_documents))
        .route("/report", post(analysis::report))
        .layer(DefaultBodyLimit::max(max_body))
}

fn cors_layer(enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::new();
    }
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full router over `state`.
///
/// Requests pass the trace span first, then get their id, then are logged;
/// CORS, compression and the timeout wrap the handlers themselves. A request
/// that exceeds the timeout is answered with 408 and its analysis is dropped,
/// which cancels it.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let config = &state.config;
    let timeout = TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, config.timeout());

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .nest("/api/v1", analysis_routes(config.max_body_size()))
        .fallback(not_found)
        .layer(timeout)
        .layer(CompressionLayer::new())
        .layer(cors_layer(config.enable_cors))
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Installs JSON logging, builds the engine, then serves until SIGTERM or
/// Ctrl+C.
///
/// ```rust,no_run
/// # async fn run() -> anyhow::Result<()> {
/// server::start_server(server::ServerConfig::load()?).await
/// # }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .json()
        .init();

    let addr = config.socket_addr()?;
    let state = Arc::new(ServerState::new(config)?);

    let detector = state.engine.detector().config();
    info!(
        %addr,
        policy = ?detector.policy,
        strategy = ?detector.strategy,
        remote_source = state.engine.source().map(|s| s.name()).unwrap_or("none"),
        timeout_secs = state.config.timeout_secs,
        max_body_mb = state.config.max_body_size_mb,
        "plagio server starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("plagio server stopped");
    Ok(())
}

/// Resolves on the first shutdown signal. A handler that fails to install
/// is logged and never fires, leaving the other one in charge.
async fn shutdown_signal() {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for Ctrl+C");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot install SIGTERM handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };
    info!(signal = received, "draining connections");
}
