//! `viewdeck` — an intent-driven view registry.
//!
//! ARCHITECTURE
//! ============
//! An agent composes the screen by sending intents. The relay hub fans them
//! out to connected clients; each client's agent socket decodes them and
//! applies them to its registry through one entry point, then signals
//! render listeners, which recompose the mounted components.
//!
//! ```text
//! agent ──POST/ws──▶ relay hub ──ws──▶ agent socket ──▶ apply_intent ──▶ Registry
//!                                                            │
//!                                    local actions ──────────┘──▶ RenderEvent ──▶ compose
//! ```

pub mod config;
pub mod error;
pub mod intent;
pub mod registry;
pub mod routes;
pub mod services;
pub mod state;
