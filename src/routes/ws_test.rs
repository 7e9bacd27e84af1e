use super::*;
use crate::routes::test_helpers::{spawn_relay, wait_for_peers};
use futures_util::{SinkExt, StreamExt};
use tokio::time::{Duration, timeout};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

async fn recv_text(rx: &mut mpsc::Receiver<String>) -> String {
    timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("relay receive timed out")
        .expect("channel closed")
}

#[tokio::test]
async fn inbound_message_relays_to_other_peers_only() {
    let state = RelayState::new();
    let (sender, other) = (Uuid::new_v4(), Uuid::new_v4());
    let (tx_sender, mut rx_sender) = mpsc::channel(8);
    let (tx_other, mut rx_other) = mpsc::channel(8);
    relay::join(&state, sender, tx_sender).await;
    relay::join(&state, other, tx_other).await;

    let text = r#"{"type":"render_chart","containerId":"c","chartConfig":{}}"#;
    assert_eq!(process_inbound_text(&state, sender, text).await, 1);
    assert_eq!(recv_text(&mut rx_other).await, text);
    assert!(rx_sender.try_recv().is_err());
}

#[tokio::test]
async fn malformed_inbound_message_is_dropped() {
    let state = RelayState::new();
    let (sender, other) = (Uuid::new_v4(), Uuid::new_v4());
    let (tx_other, mut rx_other) = mpsc::channel(8);
    relay::join(&state, other, tx_other).await;

    assert_eq!(process_inbound_text(&state, sender, "{broken").await, 0);
    assert_eq!(process_inbound_text(&state, sender, r#"{"payload":1}"#).await, 0);
    assert!(rx_other.try_recv().is_err());
}

#[tokio::test]
async fn websocket_peers_exchange_messages_through_hub() {
    let (addr, state) = spawn_relay().await;
    let url = format!("ws://{addr}/ws");

    let (mut agent, _) = connect_async(url.as_str()).await.expect("agent connect");
    let (mut frontend, _) = connect_async(url.as_str()).await.expect("frontend connect");
    wait_for_peers(&state, 2).await;

    let intent = r#"{"type":"set_view","view_id":"triage"}"#;
    agent.send(WsMessage::Text(intent.into())).await.unwrap();

    let msg = timeout(Duration::from_secs(1), frontend.next())
        .await
        .expect("frontend receive timed out")
        .expect("stream ended")
        .expect("websocket error");
    assert_eq!(msg.into_text().unwrap().as_str(), intent);

    frontend.close(None).await.unwrap();
    wait_for_peers(&state, 1).await;
}
