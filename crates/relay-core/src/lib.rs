//! relay-core
//!
//! Pure chat relay logic:
//! - messages (logical inbound/outbound types)
//! - connection registry (who is currently online)
//! - per-connection session router
//!
//! Transport concerns (websocket handshake, framing, page serving) live
//! in `relay-server`; wire encoding lives in `relay-protocol`.

pub mod messages;
pub mod registry;
pub mod session;

pub use messages::{ClientMessage, Outbound, ServerEvent};
pub use registry::{Registry, Sink};
pub use session::Session;
