//! Shared application state.
//!
//! DESIGN
//! ======
//! `ViewState` is the single owned container around the registry. Local UI
//! actions and the agent socket both hold clones of it and route every
//! mutation through `services::view::apply_intent`, which takes the write
//! lock for the whole read-modify-write. Render listeners live next to the
//! registry so an applied intent and its render event are published under
//! the same lock, in arrival order.
//!
//! `RelayState` is the hub side: the set of connected peers that intents
//! are fanned out to.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::intent::ViewId;
use crate::registry::{ConstraintPolicy, Registry};

// =============================================================================
// RENDER EVENT
// =============================================================================

/// Published to every listener after an intent changes the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEvent {
    /// Monotonic per-state counter, starting at 1.
    pub seq: u64,
    /// Wire tag of the intent that caused the change.
    pub intent: &'static str,
    /// Current view after the change.
    pub current_view: ViewId,
}

// =============================================================================
// VIEW STATE
// =============================================================================

/// Registry plus its render listeners.
pub struct ViewInner {
    pub(crate) registry: Registry,
    /// Render listeners: `listener_id` -> sender for render events.
    pub(crate) listeners: HashMap<Uuid, mpsc::Sender<RenderEvent>>,
    /// Sequence number of the last published render event.
    pub(crate) seq: u64,
}

/// Cloneable handle to the one registry owned by this process.
#[derive(Clone)]
pub struct ViewState {
    pub(crate) inner: Arc<RwLock<ViewInner>>,
}

impl ViewState {
    #[must_use]
    pub fn new(policy: ConstraintPolicy) -> Self {
        Self::from_registry(Registry::with_policy(policy))
    }

    #[must_use]
    pub fn from_registry(registry: Registry) -> Self {
        let inner = ViewInner { registry, listeners: HashMap::new(), seq: 0 };
        Self { inner: Arc::new(RwLock::new(inner)) }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ConstraintPolicy::default())
    }
}

// =============================================================================
// RELAY STATE
// =============================================================================

/// Hub state, injected into Axum handlers via the `State` extractor.
#[derive(Clone, Default)]
pub struct RelayState {
    /// Connected peers: `peer_id` -> sender for outgoing text messages.
    pub peers: Arc<RwLock<HashMap<Uuid, mpsc::Sender<String>>>>,
}

impl RelayState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
