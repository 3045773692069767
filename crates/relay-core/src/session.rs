//! Per-connection session router.
//!
//! One `Session` exists per live connection. It classifies each inbound
//! [`ClientMessage`] and either replies on its own sink (liveness probe)
//! or routes through the shared [`Registry`] (announcements and chat).
//!
//! Lifecycle: `Unidentified` until the first `INIT` arrives, then
//! `Identified`; the transport layer calls [`Session::close`] exactly
//! once when the connection ends, which deregisters the identity and
//! announces the departure. The two pre-terminal states are encoded by
//! the `identity` option rather than a separate enum.
//!
//! Trust note: the `id` field on `TEXT` payloads is relayed verbatim and
//! never verified against the session's announced identity, so a client
//! can claim to send as anyone. That matches the observed protocol; a
//! hardened deployment would stamp outgoing messages with the announced
//! identity instead.

use std::sync::Arc;

use tracing::debug;

use crate::messages::{ClientMessage, Outbound, ServerEvent};
use crate::registry::{Registry, Sink};

/// Router for a single connection's inbound traffic.
pub struct Session {
    /// This connection's own outbound sink, used for `pong` replies and
    /// handed to the registry on announcement.
    sink: Sink,

    /// Shared registry of everyone currently online.
    registry: Arc<Registry>,

    /// Announced identity; `None` until the first `INIT`.
    identity: Option<String>,
}

impl Session {
    /// Create a session for a freshly accepted connection.
    pub fn new(sink: Sink, registry: Arc<Registry>) -> Self {
        Session {
            sink,
            registry,
            identity: None,
        }
    }

    /// The announced identity, if any.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Route one inbound message.
    pub async fn handle(&mut self, msg: ClientMessage) {
        match msg {
            ClientMessage::Ping => self.reply_pong(),
            ClientMessage::Init { id } => self.announce(id).await,
            ClientMessage::Text { id, to, text } => self.relay_text(id, to, text).await,
        }
    }

    /// Run the departure path for a closed connection.
    ///
    /// Safe to call on a never-identified session (no registry
    /// interaction) and idempotent: the identity is taken out, so a
    /// second call is a no-op.
    pub async fn close(&mut self) {
        if let Some(id) = self.identity.take() {
            self.registry.unregister(&id).await;
            self.registry
                .broadcast_except(&id, ServerEvent::user_leave(id.clone()))
                .await;
        }
    }

    fn reply_pong(&self) {
        // Probe reply goes only to the prober; the registry is untouched.
        if self.sink.send(Outbound::Pong).is_err() {
            debug!("own sink closed, dropping pong");
        }
    }

    async fn announce(&mut self, id: String) {
        // A re-announcement under a different id leaves the old entry
        // registered against this same sink until disconnect. Known
        // quirk of the protocol; kept as-is.
        self.identity = Some(id.clone());
        self.registry.register(id.clone(), self.sink.clone()).await;
        self.registry
            .broadcast_except(&id, ServerEvent::user_enter(id.clone()))
            .await;
    }

    async fn relay_text(&self, id: String, to: Option<String>, text: String) {
        match to {
            Some(to) if !to.is_empty() => {
                let delivered = self
                    .registry
                    .send_to(&to, ServerEvent::dm(id, text))
                    .await;
                if !delivered {
                    // Best-effort: the sender is not told.
                    debug!(target_id = %to, "direct message target not online, dropped");
                }
            }
            _ => {
                self.registry
                    .broadcast_except(&id, ServerEvent::msg(id.clone(), text))
                    .await;
            }
        }
    }
}
