//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The relay hub exposes one websocket endpoint that frontends and agents
//! join, an HTTP endpoint for agents that prefer fire-and-forget POSTs,
//! and a health check.

pub mod intents;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::RelayState;

/// Build the relay router.
pub fn app(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/api/intents", post(intents::post_intent))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::test_helpers::spawn_relay;

    #[tokio::test]
    async fn healthz_returns_ok() {
        let (addr, _state) = spawn_relay().await;
        let response = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }
}
