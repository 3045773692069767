//! Message types used by the relay core.
//!
//! These are **transport-agnostic** logical messages:
//! - [`ClientMessage`]: what a session consumes.
//! - [`ServerEvent`]: what the relay produces for delivery to clients.
//! - [`Outbound`]: everything that can flow down a single connection's
//!   sink, including the liveness `pong` reply which is a bare text
//!   payload rather than a structured event.
//!
//! The JSON encoder/decoder lives in the `relay-protocol` crate; this
//! module is purely logical.

/// A classified inbound payload from one client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Liveness probe: the literal text `"ping"`.
    Ping,

    /// Identity announcement (`INIT`).
    Init { id: String },

    /// Chat message (`TEXT`).
    ///
    /// `to` of `None` or `Some("")` means broadcast; anything else is a
    /// direct message to that identity.
    ///
    /// `id` is whatever the client put in the payload. It is relayed
    /// verbatim and never checked against the session's announced
    /// identity; see the trust note on [`crate::Session`].
    Text {
        id: String,
        to: Option<String>,
        text: String,
    },
}

/// A structured event delivered to one or more clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Broadcast chat message from `id` (`MSG`).
    Msg { id: String, text: String },

    /// Direct chat message from `id` (`DM`).
    Dm { id: String, text: String },

    /// Presence: `id` joined (`USER_ENTER`).
    UserEnter { id: String },

    /// Presence: `id` left (`USER_LEAVE`).
    UserLeave { id: String },
}

/// Anything that can be queued on a single connection's outbound sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Liveness reply: the literal text `"pong"`, sent only to the prober.
    Pong,

    /// A structured event to encode and deliver.
    Event(ServerEvent),
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl ServerEvent {
    /// Convenience constructor for a broadcast chat message.
    pub fn msg(id: impl Into<String>, text: impl Into<String>) -> Self {
        ServerEvent::Msg {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Convenience constructor for a direct chat message.
    pub fn dm(id: impl Into<String>, text: impl Into<String>) -> Self {
        ServerEvent::Dm {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Convenience constructor for a join notice.
    pub fn user_enter(id: impl Into<String>) -> Self {
        ServerEvent::UserEnter { id: id.into() }
    }

    /// Convenience constructor for a leave notice.
    pub fn user_leave(id: impl Into<String>) -> Self {
        ServerEvent::UserLeave { id: id.into() }
    }
}

impl From<ServerEvent> for Outbound {
    fn from(event: ServerEvent) -> Self {
        Outbound::Event(event)
    }
}
