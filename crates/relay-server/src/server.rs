//! Listener and top-level server wiring.
//!
//! This module:
//! - Serves the static landing page at `/`.
//! - Upgrades websocket connections at `/chat`.
//! - Assigns each connection a `ConnId` for log context.
//! - Enforces the live-connection cap.
//! - Spawns nothing itself: each upgraded socket runs as its own task
//!   inside axum, driven by `session_task::run_session`.
//!
//! The per-connection logic lives in the `session_task` module.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;

use relay_core::Registry;

use crate::config::Config;
use crate::session_task;

/// Counter for assigning unique connection ids.
///
/// In a more elaborate setup you might encapsulate this in a struct,
/// but this is sufficient and threadsafe for our server.
static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

fn next_conn_id() -> u64 {
    NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shared handles for the axum handlers.
#[derive(Clone)]
struct AppState {
    registry: Arc<Registry>,
    live_conns: Arc<AtomicUsize>,
    max_clients: usize,
}

/// Decrements the live-connection count when the connection task ends,
/// whichever way it ends.
struct ConnSlot(Arc<AtomicUsize>);

impl ConnSlot {
    fn acquire(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        ConnSlot(counter)
    }
}

impl Drop for ConnSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Run the websocket server with the given configuration.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState {
        registry: Arc::new(Registry::new()),
        live_conns: Arc::new(AtomicUsize::new(0)),
        max_clients: config.max_clients,
    };

    let app = Router::new()
        .route_service("/", ServeFile::new(&config.index_page))
        .route("/chat", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, max_clients = config.max_clients, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    if state.live_conns.load(Ordering::Relaxed) >= state.max_clients {
        info!(
            max_clients = state.max_clients,
            "refusing connection: max_clients reached"
        );
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let conn_id = next_conn_id();
    let slot = ConnSlot::acquire(state.live_conns.clone());
    let registry = state.registry.clone();

    ws.on_upgrade(move |socket| async move {
        let _slot = slot;
        session_task::run_session(conn_id, socket, registry).await;
    })
    .into_response()
}
