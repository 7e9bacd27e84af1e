//! Intent — the closed set of mutations an agent may request.
//!
//! DESIGN
//! ======
//! Intents are plain data. They arrive as UTF-8 JSON objects tagged by a
//! mandatory `type` field and are decoded here before reaching the registry.
//! Field names follow the wire contract (`view_id`, `containerId`,
//! `chartConfig`, ...), not Rust naming.
//!
//! DECODING RULES
//! ==============
//! - Not JSON, not an object, or no string `type` → malformed (`IntentError`).
//! - Known `type` with a bad payload → malformed (`IntentError::Payload`).
//! - Unknown `type` → `Intent::Unknown`, which the registry ignores.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Flat property bag for dynamic components.
pub type Props = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// VIEW IDENTIFIER
// =============================================================================

/// Top-level screen identifier. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    CustomerList,
    CustomerDetail,
    Triage,
    Dashboard,
    Analytics,
    Timeline,
    Calendar,
    Workflow,
}

impl ViewId {
    /// Every member of the closed set, in declaration order.
    pub const ALL: [ViewId; 8] = [
        ViewId::CustomerList,
        ViewId::CustomerDetail,
        ViewId::Triage,
        ViewId::Dashboard,
        ViewId::Analytics,
        ViewId::Timeline,
        ViewId::Calendar,
        ViewId::Workflow,
    ];

    /// View selected at startup.
    pub const DEFAULT: ViewId = ViewId::CustomerList;

    /// Wire form of the identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ViewId::CustomerList => "customer-list",
            ViewId::CustomerDetail => "customer-detail",
            ViewId::Triage => "triage",
            ViewId::Dashboard => "dashboard",
            ViewId::Analytics => "analytics",
            ViewId::Timeline => "timeline",
            ViewId::Calendar => "calendar",
            ViewId::Workflow => "workflow",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewId {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewId::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| IntentError::UnknownView(s.to_owned()))
    }
}

// =============================================================================
// INTENT
// =============================================================================

/// One declarative mutation of the view registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    SetView {
        view_id: ViewId,
    },
    AddPanel {
        panel: String,
    },
    RemovePanel {
        panel: String,
    },
    RenderChart {
        #[serde(rename = "containerId")]
        container_id: String,
        #[serde(rename = "chartConfig")]
        chart_config: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    AddComponent {
        id: String,
        component: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<Props>,
    },
    UpdateComponentProps {
        id: String,
        props: Props,
    },
    RemoveComponent {
        id: String,
    },
    /// Any `type` outside the closed set. Ignored by the applier.
    #[serde(other)]
    Unknown,
}

impl Intent {
    /// Wire tag of this intent, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::SetView { .. } => "set_view",
            Intent::AddPanel { .. } => "add_panel",
            Intent::RemovePanel { .. } => "remove_panel",
            Intent::RenderChart { .. } => "render_chart",
            Intent::AddComponent { .. } => "add_component",
            Intent::UpdateComponentProps { .. } => "update_component_props",
            Intent::RemoveComponent { .. } => "remove_component",
            Intent::Unknown => "unknown",
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Reasons an inbound message could not be decoded into an intent.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("invalid json: {0}")]
    Json(#[source] serde_json::Error),

    #[error("intent must be a JSON object")]
    NotAnObject,

    #[error("intent is missing a string `type` field")]
    MissingType,

    #[error("invalid {kind} payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown view id: {0}")]
    UnknownView(String),
}

impl ErrorCode for IntentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_INTENT_JSON",
            Self::NotAnObject => "E_INTENT_NOT_OBJECT",
            Self::MissingType => "E_INTENT_MISSING_TYPE",
            Self::Payload { .. } => "E_INTENT_PAYLOAD",
            Self::UnknownView(_) => "E_UNKNOWN_VIEW",
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode one inbound text message into an intent.
///
/// # Errors
///
/// Returns an `IntentError` when the message is malformed. Unknown `type`
/// values decode successfully to `Intent::Unknown`.
pub fn decode_intent(text: &str) -> Result<Intent, IntentError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(IntentError::Json)?;
    decode_intent_value(value)
}

/// Decode an already-parsed JSON value into an intent.
///
/// # Errors
///
/// Same rules as [`decode_intent`].
pub fn decode_intent_value(value: serde_json::Value) -> Result<Intent, IntentError> {
    let Some(obj) = value.as_object() else {
        return Err(IntentError::NotAnObject);
    };
    let Some(kind) = obj.get("type").and_then(serde_json::Value::as_str) else {
        return Err(IntentError::MissingType);
    };
    let kind = kind.to_owned();
    serde_json::from_value(value).map_err(|source| IntentError::Payload { kind, source })
}

#[cfg(test)]
#[path = "intent_test.rs"]
mod tests;
