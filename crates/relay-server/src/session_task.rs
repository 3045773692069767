//! Per-connection websocket pumping.
//!
//! Each upgraded socket gets:
//! - a writer task that drains the session's outbound channel, encodes
//!   each item, and writes it as a text frame;
//! - a reader loop that decodes inbound text frames and feeds them to
//!   the `relay_core::Session`.
//!
//! When the reader loop ends — close frame, transport error, or the peer
//! vanishing — the departure cleanup runs exactly once, then the session
//! (and with it the outbound sender) is dropped so the writer drains its
//! queue and exits.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use relay_core::{Outbound, Registry, Session};
use relay_protocol::json_codec;

/// Drive one websocket connection until it closes.
pub(crate) async fn run_session(conn_id: u64, socket: WebSocket, registry: Arc<Registry>) {
    info!(conn_id, "connection open");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx): (
        mpsc::UnboundedSender<Outbound>,
        mpsc::UnboundedReceiver<Outbound>,
    ) = mpsc::unbounded_channel();

    // Writer task: serializes all transport writes for this connection,
    // whether queued by this session or by a broadcasting peer.
    let writer = tokio::spawn(async move {
        while let Some(out) = out_rx.recv().await {
            let payload = match json_codec::encode_outbound(&out) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(conn_id, %err, "failed to encode outbound payload");
                    continue;
                }
            };

            if ws_tx.send(Message::Text(payload)).await.is_err() {
                debug!(conn_id, "write failed, peer gone");
                break;
            }
        }
    });

    let mut session = Session::new(out_tx, registry);

    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(payload)) => match json_codec::decode_client_payload(&payload) {
                Some(msg) => session.handle(msg).await,
                None => debug!(conn_id, %payload, "ignoring unrecognized payload"),
            },
            Ok(Message::Close(_)) => {
                debug!(conn_id, "close frame received");
                break;
            }
            // Protocol-level ping/pong and binary frames carry nothing
            // for the relay; axum answers websocket pings itself.
            Ok(_) => continue,
            Err(err) => {
                warn!(conn_id, %err, "websocket error");
                break;
            }
        }
    }

    let identity = session.identity().map(str::to_owned);
    session.close().await;

    // Dropping the session closes the outbound channel; await the writer
    // so anything already queued still flushes.
    drop(session);
    let _ = writer.await;

    match identity {
        Some(id) => info!(conn_id, %id, "connection closed"),
        None => info!(conn_id, "connection closed (never identified)"),
    }
}
