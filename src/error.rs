//! Error codes shared by every error enum in the crate.
//!
//! Each concern owns its own `thiserror` enum; this trait gives them a
//! grepable code and a retryable flag so log lines and HTTP error bodies
//! carry the same identifiers.

/// Grepable error code and retryable flag for structured error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Render any `ErrorCode` as the JSON body used by the relay's HTTP surface.
#[must_use]
pub fn error_body(err: &(impl ErrorCode + ?Sized)) -> serde_json::Value {
    serde_json::json!({
        "code": err.error_code(),
        "message": err.to_string(),
        "retryable": err.retryable(),
    })
}
