//! relay-server
//!
//! Multi-client async websocket server for the chat relay.

pub mod config;
pub mod server;

// internal module, not re-exported
mod session_task;
