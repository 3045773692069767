//! Shared registry of online identities.
//!
//! The registry is the only shared mutable state in the relay: a map
//! from announced identity to that connection's outbound sink. Every
//! session holds an `Arc<Registry>` and goes through it for directed
//! sends and broadcasts.
//!
//! Delivery is best-effort by design: a missing target or a sink whose
//! receiver is already gone is reported as a `false`/skipped outcome,
//! never an error. Callers decide whether they care (they mostly don't).

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::messages::{Outbound, ServerEvent};

/// Outbound sink for one connection.
///
/// Sends never block; the connection's writer task drains the other end
/// and serializes actual transport writes.
pub type Sink = mpsc::UnboundedSender<Outbound>;

/// Map of currently online identities to their sinks.
///
/// - An identity is present iff a live session announced it and has not
///   yet terminated.
/// - At most one sink per identity; a re-announcement overwrites
///   (last-writer-wins, no duplicate rejection).
#[derive(Debug, Default)]
pub struct Registry {
    conns: RwLock<HashMap<String, Sink>>,
}

impl Registry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Insert or overwrite the mapping `identity -> sink`.
    ///
    /// From this point the identity is visible to `send_to` and
    /// `broadcast_except` calls from every session.
    pub async fn register(&self, identity: impl Into<String>, sink: Sink) {
        let identity = identity.into();
        let mut guard = self.conns.write().await;
        guard.insert(identity, sink);
    }

    /// Remove the mapping for `identity`. No-op if absent.
    pub async fn unregister(&self, identity: &str) {
        let mut guard = self.conns.write().await;
        guard.remove(identity);
    }

    /// Deliver `event` to the sink registered under `identity`.
    ///
    /// Returns `true` on delivery. Returns `false`, with no delivery,
    /// when the identity is not registered or its receiver is gone.
    pub async fn send_to(&self, identity: &str, event: ServerEvent) -> bool {
        let guard = self.conns.read().await;
        match guard.get(identity) {
            Some(sink) => match sink.send(Outbound::Event(event)) {
                Ok(()) => true,
                Err(_) => {
                    debug!(target_id = %identity, "sink closed, dropping direct delivery");
                    false
                }
            },
            None => false,
        }
    }

    /// Deliver `event` to every registered sink except `excluded`.
    ///
    /// Iteration order is unspecified. Each delivery is independent: a
    /// closed sink is logged and skipped, the rest still receive the
    /// event.
    pub async fn broadcast_except(&self, excluded: &str, event: ServerEvent) {
        // Snapshot under the read lock so sends happen outside it.
        let targets: Vec<(String, Sink)> = {
            let guard = self.conns.read().await;
            guard
                .iter()
                .filter(|(identity, _)| identity.as_str() != excluded)
                .map(|(identity, sink)| (identity.clone(), sink.clone()))
                .collect()
        };

        for (identity, sink) in targets {
            if sink.send(Outbound::Event(event.clone())).is_err() {
                debug!(target_id = %identity, "sink closed, skipping broadcast delivery");
            }
        }
    }

    /// Whether `identity` is currently registered.
    pub async fn contains(&self, identity: &str) -> bool {
        let guard = self.conns.read().await;
        guard.contains_key(identity)
    }

    /// Number of currently registered identities.
    pub async fn len(&self) -> usize {
        let guard = self.conns.read().await;
        guard.len()
    }

    /// True when no identity is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
