//! Intent ingress over HTTP.
//!
//! `POST /api/intents` takes one intent as the JSON body, validates it, and
//! fans it out to every connected peer. Unknown `type` values pass; the
//! receiving registry ignores them.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use crate::error::{ErrorCode, error_body};
use crate::intent::decode_intent;
use crate::services::relay;
use crate::state::RelayState;

pub async fn post_intent(State(state): State<RelayState>, body: String) -> Response {
    let intent = match decode_intent(&body) {
        Ok(intent) => intent,
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "intents: rejected malformed intent");
            return (StatusCode::BAD_REQUEST, Json(error_body(&e))).into_response();
        }
    };

    let delivered = relay::broadcast(&state, body.trim(), None).await;
    info!(kind = intent.kind(), delivered, "intents: broadcast");
    (StatusCode::ACCEPTED, Json(serde_json::json!({ "delivered": delivered }))).into_response()
}
