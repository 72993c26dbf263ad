//! Plagio Server - HTTP REST API for document-similarity analysis
//!
//! Exposes the plagio engine over HTTP. Every analysis runs on the shared
//! detector and, when configured, the shared remote match source.
//!
//! Tests drive [`build_router`] directly with a prepared [`ServerState`];
//! the `plagio-server` binary calls [`start_server`] with
//! [`ServerConfig::load`].
//!
//! # Routes
//!
//! - `GET /` - name, version and route list
//! - `GET /health` - liveness, uptime and the active remote source
//! - `POST /api/v1/analyze` - Analyze `{documents: [{name, content}], policy?, strategy?}`
//! - `POST /api/v1/compare` - Compare `{document_a, document_b}`
//! - `POST /api/v1/report` - Same body as analyze, answers with a `text/plain` report
//!
//! Errors come back as `{"error": {"code", "message"}}`. Missing documents
//! are a 400; anything the client cannot fix is a 500 with a short message,
//! the detail stays in the logs.
//!
//! # Env vars to know
//!
//! - `PLAGIO_SERVER__PORT`, `PLAGIO_SERVER__BIND_ADDR`, `PLAGIO_SERVER__TIMEOUT_SECS`
//! - `PLAGIO_SERVER__PIPELINE_CONFIG` - YAML pipeline file
//! - `PLAGIO_SERVER__ENABLE_REMOTE` - consult the generative model (needs `GEMINI_API_KEY`)

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
