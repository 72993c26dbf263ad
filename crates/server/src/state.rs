use std::sync::Arc;
use std::time::Instant;

use plagio::{Engine, PlagioConfig};
use serde::Serialize;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Everything a handler needs; cloned per request behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,
    /// Detector plus the optional remote source, shared by all requests.
    pub engine: Engine,
    started: Instant,
}

impl ServerState {
    /// Builds the engine from `pipeline_config` (or defaults).
    /// `enable_remote` switches the remote source on even when the file
    /// leaves it off.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let mut pipeline = match config.pipeline_config.as_deref() {
            Some(path) => {
                info!(path, "loading pipeline config");
                PlagioConfig::from_file(path)?
            }
            None => PlagioConfig::default(),
        };
        pipeline.remote.enabled |= config.enable_remote;

        let engine = Engine::from_config(&pipeline)?;
        Ok(Self::with_engine(config, engine))
    }

    pub fn with_engine(config: ServerConfig, engine: Engine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            started: Instant::now(),
        }
    }

    pub fn metadata(&self) -> ServerMetadata {
        ServerMetadata {
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: self.started.elapsed().as_secs(),
            remote_source: self.engine.source().map(|s| s.name().to_owned()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServerMetadata {
    pub version: &'static str,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_source: Option<String>,
}
