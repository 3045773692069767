//! relay-protocol
//!
//! Wire-level encoding/decoding for the chat relay.
//!
//! This crate is responsible for turning logical relay messages
//! (`relay_core::ClientMessage` / `Outbound`) into text payloads and
//! back again.
//!
//! - [`wire_types`] : serde frame definitions (`mtype`-tagged JSON)
//! - [`json_codec`] : payload-level decode/encode, including the bare
//!   `"ping"` / `"pong"` liveness texts

pub mod json_codec;
pub mod wire_types;

pub use json_codec::{decode_client_payload, encode_outbound, PING, PONG};
pub use wire_types::{ClientFrame, ServerFrame};
