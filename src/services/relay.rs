//! Relay service — peer membership and fan-out for the intent hub.
//!
//! DESIGN
//! ======
//! Every connected peer (frontend view, agent, observer) is an equal member
//! of one hub. Text received from a peer is forwarded verbatim to all other
//! peers once it passes the envelope check: a JSON object with a string
//! `type`. The hub does not interpret intents beyond that; a frontend that
//! does not recognize a `type` ignores it.

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::intent::IntentError;
use crate::state::RelayState;

/// Register a peer's outbound channel.
pub async fn join(state: &RelayState, peer_id: Uuid, tx: mpsc::Sender<String>) {
    let mut peers = state.peers.write().await;
    peers.insert(peer_id, tx);
    info!(%peer_id, peers = peers.len(), "relay: peer connected");
}

/// Remove a peer.
pub async fn part(state: &RelayState, peer_id: Uuid) {
    let mut peers = state.peers.write().await;
    peers.remove(&peer_id);
    info!(%peer_id, peers = peers.len(), "relay: peer disconnected");
}

pub async fn peer_count(state: &RelayState) -> usize {
    state.peers.read().await.len()
}

/// Send `text` to every peer except `exclude`. Returns how many peers
/// accepted it.
pub async fn broadcast(state: &RelayState, text: &str, exclude: Option<Uuid>) -> usize {
    let peers = state.peers.read().await;
    let mut delivered = 0;
    for (peer_id, tx) in peers.iter() {
        if exclude == Some(*peer_id) {
            continue;
        }
        // Best-effort: a full or closed peer channel is skipped.
        match tx.try_send(text.to_owned()) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(%peer_id, error = %e, "relay: peer send skipped"),
        }
    }
    if delivered == 0 {
        warn!("relay: no peers received message");
    }
    delivered
}

/// Check that `text` is a JSON object carrying a string `type` and return
/// that type.
///
/// # Errors
///
/// Returns the matching `IntentError` for invalid JSON, non-objects, and a
/// missing or non-string `type`.
pub fn envelope_kind(text: &str) -> Result<String, IntentError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(IntentError::Json)?;
    let Some(obj) = value.as_object() else {
        return Err(IntentError::NotAnObject);
    };
    obj.get("type")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or(IntentError::MissingType)
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
