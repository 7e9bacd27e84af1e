//! View service — the single entry point that mutates the registry.
//!
//! DESIGN
//! ======
//! `apply_intent` holds the write lock across apply + publish, so two
//! producers (agent socket, local UI) can never interleave inside one
//! intent and listeners observe events in the order intents were applied.

use tracing::debug;

use crate::intent::Intent;
use crate::registry::{Outcome, Registry};
use crate::services::render;
use crate::state::{RenderEvent, ViewState};

/// Apply one intent and notify render listeners if it changed anything.
pub async fn apply_intent(state: &ViewState, intent: &Intent) -> Outcome {
    let mut inner = state.inner.write().await;
    let outcome = inner.registry.apply(intent);

    match &outcome {
        Outcome::Applied(change) => {
            inner.seq += 1;
            let event = RenderEvent { seq: inner.seq, intent: intent.kind(), current_view: inner.registry.current_view() };
            debug!(seq = event.seq, kind = intent.kind(), ?change, "view: intent applied");
            render::publish(&mut inner, &event);
        }
        Outcome::Ignored(reason) => {
            debug!(kind = intent.kind(), ?reason, "view: intent ignored");
        }
    }

    outcome
}

/// Clone of the current registry for readers such as the view composer.
pub async fn snapshot(state: &ViewState) -> Registry {
    state.inner.read().await.registry.clone()
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
