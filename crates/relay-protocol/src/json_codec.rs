//! Payload-level decode/encode.
//!
//! Inbound payloads are classified in two steps: the literal `"ping"`
//! probe is matched first, before any JSON parsing; everything else must
//! decode to a recognized [`ClientFrame`] or it is dropped (`None`). The
//! relay deliberately never answers malformed input.

use relay_core::{ClientMessage, Outbound};

use crate::wire_types::{ClientFrame, ServerFrame};

/// Liveness probe payload (client → server).
pub const PING: &str = "ping";

/// Liveness reply payload (server → client).
pub const PONG: &str = "pong";

/// Classify a single inbound text payload.
///
/// Returns `None` for anything that is neither the probe literal nor a
/// well-formed frame with a recognized `mtype`; callers ignore those.
pub fn decode_client_payload(payload: &str) -> Option<ClientMessage> {
    if payload == PING {
        return Some(ClientMessage::Ping);
    }

    let frame: ClientFrame = serde_json::from_str(payload).ok()?;
    Some(frame.into())
}

/// Encode one outbound item as a text payload.
pub fn encode_outbound(out: &Outbound) -> Result<String, serde_json::Error> {
    match out {
        Outbound::Pong => Ok(PONG.to_string()),
        Outbound::Event(event) => serde_json::to_string(&ServerFrame::from(event)),
    }
}
