//! Agent socket — the transport adapter between the agent hub and the
//! local registry.
//!
//! DESIGN
//! ======
//! One persistent connection at a time. Inbound text is decoded as an
//! intent and applied through `services::view`, which publishes the render
//! signal. Outbound `event` messages go through an `AgentLink`, which only
//! holds a sender while a connection is open.
//!
//! LIFECYCLE
//! =========
//! 1. Connect. On failure, go to 4.
//! 2. Attach the outbound channel to the link.
//! 3. Pump inbound/outbound until close or error, then detach.
//! 4. Sleep exactly `reconnect_delay`, go to 1. Forever.
//!
//! Messages sent by either side while disconnected are lost; nothing is
//! queued or replayed across a reconnect.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::intent::{Props, decode_intent};
use crate::registry::Outcome;
use crate::services::view;
use crate::state::ViewState;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

const OUTBOUND_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket connect failed: {0}")]
    Connect(String),
    #[error("websocket receive failed: {0}")]
    Receive(String),
    #[error("websocket send failed: {0}")]
    Send(String),
}

impl ErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Connect(_) => "E_WS_CONNECT",
            Self::Receive(_) => "E_WS_RECEIVE",
            Self::Send(_) => "E_WS_SEND",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

// =============================================================================
// CONNECTION SEAM
// =============================================================================

/// One open text-message connection.
#[async_trait]
pub trait Connection: Send {
    /// Next inbound text message. `None` once the peer has closed.
    async fn recv_text(&mut self) -> Option<Result<String, TransportError>>;

    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;
}

/// Opens connections for the reconnect loop.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Connection>, TransportError>;
}

/// `tokio-tungstenite` connector for `ws://` and `wss://` URLs.
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>, TransportError> {
        let (stream, _) =
            connect_async(self.url.as_str()).await.map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connection for WsConnection {
    async fn recv_text(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(_)) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(TransportError::Receive(e.to_string()))),
            }
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

// =============================================================================
// AGENT LINK
// =============================================================================

/// Result of a fire-and-forget event send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDelivery {
    Sent,
    Skipped,
}

/// Reverse channel from local UI actions to the agent.
#[derive(Clone, Default)]
pub struct AgentLink {
    outbound: Arc<RwLock<Option<mpsc::Sender<String>>>>,
}

impl AgentLink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_open(&self) -> bool {
        self.outbound.read().await.is_some()
    }

    /// Send `{"type":"event","payload":..}` if connected. Never waits for
    /// an acknowledgment.
    pub async fn send_event(&self, payload: Props) -> EventDelivery {
        let outbound = self.outbound.read().await;
        let Some(tx) = outbound.as_ref() else {
            warn!("agent socket: not connected, event skipped");
            return EventDelivery::Skipped;
        };
        let text = serde_json::json!({ "type": "event", "payload": payload }).to_string();
        match tx.try_send(text) {
            Ok(()) => EventDelivery::Sent,
            Err(e) => {
                warn!(error = %e, "agent socket: event skipped");
                EventDelivery::Skipped
            }
        }
    }

    async fn attach(&self, tx: mpsc::Sender<String>) {
        *self.outbound.write().await = Some(tx);
    }

    async fn detach(&self) {
        *self.outbound.write().await = None;
    }
}

// =============================================================================
// INBOUND
// =============================================================================

/// Decode and apply one inbound message. Malformed input is logged and
/// dropped (`None`); it never stops the listener.
pub async fn process_inbound_text(state: &ViewState, text: &str) -> Option<Outcome> {
    match decode_intent(text) {
        Ok(intent) => {
            info!(kind = intent.kind(), "agent socket: recv intent");
            Some(view::apply_intent(state, &intent).await)
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "agent socket: malformed intent dropped");
            None
        }
    }
}

// =============================================================================
// CONNECTION LOOP
// =============================================================================

/// Spawn the reconnect loop against a websocket URL.
pub fn spawn_agent_socket(url: String, state: ViewState, link: AgentLink, reconnect_delay: Duration) -> JoinHandle<()> {
    info!(%url, delay_secs = reconnect_delay.as_secs(), "agent socket configured");
    tokio::spawn(run_agent_socket(WsConnector::new(url), state, link, reconnect_delay))
}

/// Connect, pump, and reconnect after a fixed delay. Never returns.
pub async fn run_agent_socket<C: Connector>(connector: C, state: ViewState, link: AgentLink, reconnect_delay: Duration) {
    loop {
        match connector.connect().await {
            Ok(mut conn) => {
                info!("agent socket: connected");
                match pump(conn.as_mut(), &state, &link).await {
                    Ok(()) => info!("agent socket: disconnected"),
                    Err(e) => warn!(error = %e, code = e.error_code(), "agent socket: connection error"),
                }
            }
            Err(e) => warn!(error = %e, code = e.error_code(), "agent socket: connect failed"),
        }

        info!(delay_ms = u64::try_from(reconnect_delay.as_millis()).unwrap_or(u64::MAX), "agent socket: reconnecting");
        tokio::time::sleep(reconnect_delay).await;
    }
}

async fn pump(conn: &mut dyn Connection, state: &ViewState, link: &AgentLink) -> Result<(), TransportError> {
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_CHANNEL_CAPACITY);
    link.attach(tx).await;

    let result = loop {
        tokio::select! {
            msg = conn.recv_text() => match msg {
                None => break Ok(()),
                Some(Err(e)) => break Err(e),
                Some(Ok(text)) => {
                    process_inbound_text(state, &text).await;
                }
            },
            Some(text) = rx.recv() => {
                if let Err(e) = conn.send_text(text).await {
                    break Err(e);
                }
            }
        }
    };

    link.detach().await;
    result
}

#[cfg(test)]
#[path = "agent_socket_test.rs"]
mod tests;
