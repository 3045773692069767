//! Configuration for the relay websocket server.
//!
//! For now this is intentionally simple: you can either use defaults
//! or override via a few environment variables:
//!
//! - `RELAY_BIND_ADDR`   (default: "0.0.0.0")
//! - `RELAY_PORT`        (default: "8080")
//! - `RELAY_MAX_CLIENTS` (default: "1024")
//! - `RELAY_INDEX_PAGE`  (default: "static/index.html")

use std::env;
use std::str::FromStr;

use anyhow::Context;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// File served as the landing page at `/`.
    pub index_page: String,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("RELAY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("RELAY_PORT", 8080u16)?;
        let max_clients = read_env_or_default("RELAY_MAX_CLIENTS", 1024usize)?;
        let index_page =
            env::var("RELAY_INDEX_PAGE").unwrap_or_else(|_| "static/index.html".to_string());

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            index_page,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}")),
        Err(_) => Ok(default),
    }
}
