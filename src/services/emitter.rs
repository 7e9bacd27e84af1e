//! Emitter — agent-side client that pushes intents into the relay hub.
//!
//! The agent does not hold a websocket of its own; it POSTs each intent to
//! the relay's `/api/intents` endpoint and learns how many peers it reached.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ErrorCode;
use crate::intent::Intent;

const DEFAULT_EMIT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay rejected intent: status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl ErrorCode for EmitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "E_EMIT_HTTP",
            Self::Rejected { .. } => "E_EMIT_REJECTED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Rejected { status: 500..=599, .. })
    }
}

#[derive(Debug, Deserialize)]
struct EmitResponse {
    delivered: usize,
}

/// HTTP client bound to one relay.
#[derive(Clone)]
pub struct IntentEmitter {
    http: reqwest::Client,
    endpoint: String,
}

impl IntentEmitter {
    /// Build an emitter for a relay base URL such as `http://localhost:8765`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(relay_url: &str) -> Result<Self, EmitError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_EMIT_TIMEOUT_SECS))
            .build()?;
        let endpoint = format!("{}/api/intents", relay_url.trim_end_matches('/'));
        Ok(Self { http, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one intent. Returns the number of peers the relay delivered to.
    ///
    /// # Errors
    ///
    /// Returns `EmitError::Http` on transport failures and
    /// `EmitError::Rejected` on any non-success status.
    pub async fn emit(&self, intent: &Intent) -> Result<usize, EmitError> {
        let response = self.http.post(&self.endpoint).json(intent).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmitError::Rejected { status: status.as_u16(), body });
        }
        let parsed: EmitResponse = response.json().await?;
        Ok(parsed.delivered)
    }
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod tests;
