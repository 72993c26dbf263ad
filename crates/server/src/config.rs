use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the HTTP front end.
///
/// Every field has a default, so an empty environment yields a server on
/// `0.0.0.0:8080` running the stock detector without a remote source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Upper bound on one analysis request, in seconds.
    pub timeout_secs: u64,
    /// Largest accepted JSON body, in MiB.
    pub max_body_size_mb: usize,
    pub enable_cors: bool,
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Path of a plagio YAML file; built-in detector defaults when unset.
    pub pipeline_config: Option<String>,
    /// Turns the remote match source on regardless of the pipeline file.
    pub enable_remote: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: 8080,
            timeout_secs: 60,
            max_body_size_mb: 10,
            enable_cors: true,
            log_level: "info".into(),
            pipeline_config: None,
            enable_remote: false,
        }
    }
}

impl ServerConfig {
    /// Layers `.env`, an optional `server.{toml,yaml}` and
    /// `PLAGIO_SERVER__*` variables over the defaults; later sources win.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix("PLAGIO_SERVER").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_addr, self.port).parse()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}
