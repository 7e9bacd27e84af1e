//! Render service — observer registry for "state changed, redraw" signals.
//!
//! DESIGN
//! ======
//! Any number of listeners may subscribe; each gets a bounded channel.
//! Publishing is best-effort and never blocks the applier: a full channel
//! drops that listener's copy, a closed channel removes the listener. With
//! no listeners the event is simply dropped.

use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::state::{RenderEvent, ViewInner, ViewState};

const LISTENER_CHANNEL_CAPACITY: usize = 64;

/// Register a listener. Returns its id and the receiving end.
pub async fn subscribe(state: &ViewState) -> (Uuid, mpsc::Receiver<RenderEvent>) {
    let listener_id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(LISTENER_CHANNEL_CAPACITY);
    state.inner.write().await.listeners.insert(listener_id, tx);
    (listener_id, rx)
}

/// Remove a listener. Returns whether it was registered.
pub async fn unsubscribe(state: &ViewState, listener_id: Uuid) -> bool {
    state.inner.write().await.listeners.remove(&listener_id).is_some()
}

/// Number of currently registered listeners.
pub async fn listener_count(state: &ViewState) -> usize {
    state.inner.read().await.listeners.len()
}

/// Fan an event out to every listener. Caller holds the write lock.
pub(crate) fn publish(inner: &mut ViewInner, event: &RenderEvent) {
    inner.listeners.retain(|listener_id, tx| match tx.try_send(event.clone()) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            warn!(%listener_id, seq = event.seq, "render: listener lagging, event dropped");
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    });
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
