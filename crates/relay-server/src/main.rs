//! Websocket chat relay server binary.

use tracing::info;
use tracing_subscriber::EnvFilter;

use relay_server::config::Config;
use relay_server::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        max_clients = config.max_clients,
        "starting relay-server"
    );

    server::run(config).await
}
