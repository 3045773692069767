//! JSON frame definitions.
//!
//! Every structured payload is a JSON object tagged by its `mtype`
//! field:
//!
//! Client → server:
//! - `{"mtype": "INIT", "id": "..."}`
//! - `{"mtype": "TEXT", "id": "...", "to": "...", "text": "..."}`
//!   (`to` absent or `""` means broadcast)
//!
//! Server → client:
//! - `{"mtype": "MSG", "id": "...", "text": "..."}`
//! - `{"mtype": "DM", "id": "...", "text": "..."}`
//! - `{"mtype": "USER_ENTER", "id": "..."}`
//! - `{"mtype": "USER_LEAVE", "id": "..."}`
//!
//! The bare `"ping"` / `"pong"` liveness texts are not frames; they are
//! handled in `json_codec` before any JSON parsing happens.

use serde::{Deserialize, Serialize};

use relay_core::{ClientMessage, ServerEvent};

/// Structured client → server frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mtype")]
pub enum ClientFrame {
    /// Identity announcement.
    #[serde(rename = "INIT")]
    Init { id: String },

    /// Chat message; empty or missing `to` requests a broadcast.
    #[serde(rename = "TEXT")]
    Text {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        text: String,
    },
}

/// Structured server → client frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mtype")]
pub enum ServerFrame {
    /// Broadcast chat message.
    #[serde(rename = "MSG")]
    Msg { id: String, text: String },

    /// Direct chat message.
    #[serde(rename = "DM")]
    Dm { id: String, text: String },

    /// Presence: joined.
    #[serde(rename = "USER_ENTER")]
    UserEnter { id: String },

    /// Presence: left.
    #[serde(rename = "USER_LEAVE")]
    UserLeave { id: String },
}

impl From<ClientFrame> for ClientMessage {
    fn from(frame: ClientFrame) -> Self {
        match frame {
            ClientFrame::Init { id } => ClientMessage::Init { id },
            ClientFrame::Text { id, to, text } => ClientMessage::Text { id, to, text },
        }
    }
}

impl From<&ServerEvent> for ServerFrame {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Msg { id, text } => ServerFrame::Msg {
                id: id.clone(),
                text: text.clone(),
            },
            ServerEvent::Dm { id, text } => ServerFrame::Dm {
                id: id.clone(),
                text: text.clone(),
            },
            ServerEvent::UserEnter { id } => ServerFrame::UserEnter { id: id.clone() },
            ServerEvent::UserLeave { id } => ServerFrame::UserLeave { id: id.clone() },
        }
    }
}
