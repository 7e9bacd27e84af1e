//! WebSocket handler — hub membership and message relay.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → assign `peer_id`, join the hub
//! 2. Peer text → envelope check → broadcast to every other peer
//! 3. Hub text from other peers → forward to this peer
//! 4. Close → part

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::relay;
use crate::state::RelayState;

const PEER_CHANNEL_CAPACITY: usize = 256;

pub async fn handle_ws(State(state): State<RelayState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: RelayState) {
    let peer_id = Uuid::new_v4();
    let (peer_tx, mut peer_rx) = mpsc::channel::<String>(PEER_CHANNEL_CAPACITY);
    relay::join(&state, peer_id, peer_tx).await;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, peer_id, text.as_str()).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(text) = peer_rx.recv() => {
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    relay::part(&state, peer_id).await;
}

/// Check one inbound peer message and relay it. Returns how many peers
/// received it; malformed text is logged and dropped.
async fn process_inbound_text(state: &RelayState, peer_id: Uuid, text: &str) -> usize {
    match relay::envelope_kind(text) {
        Ok(kind) => {
            let delivered = relay::broadcast(state, text, Some(peer_id)).await;
            info!(%peer_id, %kind, delivered, "ws: relayed message");
            delivered
        }
        Err(e) => {
            warn!(%peer_id, error = %e, code = e.error_code(), "ws: malformed message dropped");
            0
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
