//! Interactive chat client for manual testing.
//!
//! Usage:
//!   cargo run --example ws_client -- <identity>
//!
//! Reads lines from stdin:
//!   - `@bob hello there` sends a direct message to "bob"
//!   - anything else is broadcast
//!   - `/ping` sends the liveness probe
//!   - `quit` / `exit` leaves

use std::env;
use std::error::Error;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use relay_protocol::{ClientFrame, ServerFrame, PING, PONG};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let identity = env::args()
        .nth(1)
        .unwrap_or_else(|| "anonymous".to_string());
    let url =
        env::var("RELAY_CLIENT_URL").unwrap_or_else(|_| "ws://127.0.0.1:8080/chat".to_string());

    println!("Connecting to {} as '{}'...", url, identity);
    let (socket, _response) = connect_async(url.as_str()).await?;
    println!("Connected.");

    let (mut ws_tx, mut ws_rx) = socket.split();

    let init = ClientFrame::Init {
        id: identity.clone(),
    };
    ws_tx.send(Message::Text(serde_json::to_string(&init)?)).await?;

    // Print everything the server pushes at us.
    let printer = tokio::spawn(async move {
        while let Some(Ok(frame)) = ws_rx.next().await {
            let Message::Text(payload) = frame else {
                continue;
            };
            if payload == PONG {
                println!("<< pong");
                continue;
            }
            match serde_json::from_str::<ServerFrame>(&payload) {
                Ok(ServerFrame::Msg { id, text }) => println!("[{}] {}", id, text),
                Ok(ServerFrame::Dm { id, text }) => println!("[{} -> you] {}", id, text),
                Ok(ServerFrame::UserEnter { id }) => println!("* {} joined", id),
                Ok(ServerFrame::UserLeave { id }) => println!("* {} left", id),
                Err(_) => println!("<< {}", payload),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        if trimmed == "/ping" {
            ws_tx.send(Message::Text(PING.to_string())).await?;
            continue;
        }

        let frame = match trimmed.strip_prefix('@') {
            Some(rest) => {
                let (to, text) = rest.split_once(' ').unwrap_or((rest, ""));
                ClientFrame::Text {
                    id: identity.clone(),
                    to: Some(to.to_string()),
                    text: text.to_string(),
                }
            }
            None => ClientFrame::Text {
                id: identity.clone(),
                to: None,
                text: trimmed.to_string(),
            },
        };

        ws_tx.send(Message::Text(serde_json::to_string(&frame)?)).await?;
    }

    println!("Exiting client.");
    printer.abort();
    Ok(())
}
