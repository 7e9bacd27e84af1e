//! Local actions — what the user does in the running client.
//!
//! The console client reads one command per line. Local commands mutate
//! the same registry as the agent, through the same `apply_intent` entry
//! point, and may report back to the agent over the `AgentLink`.
//!
//! COMMANDS
//! ========
//! - `view <view-id>`      switch view (`customer-detail`, `triage`, ...)
//! - `event <json-object>` send an event to the agent
//! - `{...}`               apply a raw intent

use crate::error::ErrorCode;
use crate::intent::{Intent, IntentError, ViewId, decode_intent};
use crate::registry::Outcome;
use crate::services::agent_socket::{AgentLink, EventDelivery};
use crate::services::view;
use crate::state::ViewState;

#[derive(Debug, thiserror::Error)]
pub enum LocalError {
    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error("event payload must be a JSON object")]
    EventPayload,

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl ErrorCode for LocalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Intent(e) => e.error_code(),
            Self::EventPayload => "E_EVENT_PAYLOAD",
            Self::UnknownCommand(_) => "E_UNKNOWN_COMMAND",
        }
    }
}

/// What a local command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAction {
    Applied(Outcome),
    Event(EventDelivery),
    Empty,
}

/// Run one console line.
///
/// # Errors
///
/// Returns a `LocalError` for unparseable lines; the registry is untouched.
pub async fn handle_line(state: &ViewState, link: &AgentLink, line: &str) -> Result<LocalAction, LocalError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LocalAction::Empty);
    }

    if line.starts_with('{') {
        let intent = decode_intent(line)?;
        return Ok(LocalAction::Applied(view::apply_intent(state, &intent).await));
    }

    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match command {
        "view" => {
            let view_id: ViewId = rest.trim().parse()?;
            let outcome = view::apply_intent(state, &Intent::SetView { view_id }).await;
            Ok(LocalAction::Applied(outcome))
        }
        "event" => {
            let value: serde_json::Value = serde_json::from_str(rest.trim()).map_err(IntentError::Json)?;
            let serde_json::Value::Object(payload) = value else {
                return Err(LocalError::EventPayload);
            };
            Ok(LocalAction::Event(link.send_event(payload).await))
        }
        other => Err(LocalError::UnknownCommand(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Change;

    #[tokio::test]
    async fn view_command_switches_view() {
        let state = ViewState::default();
        let action = handle_line(&state, &AgentLink::new(), "view triage").await.unwrap();

        assert_eq!(action, LocalAction::Applied(Outcome::Applied(Change::ViewSet(ViewId::Triage))));
        assert_eq!(view::snapshot(&state).await.current_view(), ViewId::Triage);
    }

    #[tokio::test]
    async fn raw_intent_line_is_applied() {
        let state = ViewState::default();
        let line = r#"{"type":"add_component","id":"wf","component":"WorkflowProgress"}"#;
        let action = handle_line(&state, &AgentLink::new(), line).await.unwrap();

        assert_eq!(action, LocalAction::Applied(Outcome::Applied(Change::ComponentAdded { id: "wf".into() })));
    }

    #[tokio::test]
    async fn event_without_connection_is_skipped() {
        let state = ViewState::default();
        let action = handle_line(&state, &AgentLink::new(), r#"event {"clicked":"ticket-7"}"#).await.unwrap();
        assert_eq!(action, LocalAction::Event(EventDelivery::Skipped));
    }

    #[tokio::test]
    async fn bad_lines_leave_registry_untouched() {
        let state = ViewState::default();
        let link = AgentLink::new();
        let before = view::snapshot(&state).await;

        assert!(matches!(handle_line(&state, &link, "view settings").await, Err(LocalError::Intent(_))));
        assert!(matches!(handle_line(&state, &link, "event [1]").await, Err(LocalError::EventPayload)));
        assert!(matches!(handle_line(&state, &link, "dance").await, Err(LocalError::UnknownCommand(_))));
        assert_eq!(handle_line(&state, &link, "   ").await.unwrap(), LocalAction::Empty);
        assert_eq!(view::snapshot(&state).await, before);
    }
}
