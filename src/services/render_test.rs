use super::*;
use crate::intent::{Intent, ViewId};
use crate::services::view::apply_intent;
use tokio::time::{Duration, timeout};

fn set_view(view: ViewId) -> Intent {
    Intent::SetView { view_id: view }
}

#[tokio::test]
async fn every_listener_receives_each_event() {
    let state = ViewState::default();
    let (_a, mut rx_a) = subscribe(&state).await;
    let (_b, mut rx_b) = subscribe(&state).await;

    apply_intent(&state, &set_view(ViewId::Workflow)).await;

    for rx in [&mut rx_a, &mut rx_b] {
        let event = timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("render event timed out")
            .expect("channel closed");
        assert_eq!(event.current_view, ViewId::Workflow);
    }
}

#[tokio::test]
async fn publish_without_listeners_is_dropped() {
    let state = ViewState::default();
    assert_eq!(listener_count(&state).await, 0);

    // Nothing to deliver to; the apply still succeeds.
    assert!(apply_intent(&state, &set_view(ViewId::Calendar)).await.is_applied());

    // A listener registered afterwards does not see the earlier signal.
    let (_id, mut rx) = subscribe(&state).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let state = ViewState::default();
    let (id, mut rx) = subscribe(&state).await;

    assert!(unsubscribe(&state, id).await);
    assert!(!unsubscribe(&state, id).await);

    apply_intent(&state, &set_view(ViewId::Triage)).await;
    // Sender was dropped with the listener entry, so the channel is closed.
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn closed_listener_is_pruned_on_publish() {
    let state = ViewState::default();
    let (_id, rx) = subscribe(&state).await;
    drop(rx);
    assert_eq!(listener_count(&state).await, 1);

    apply_intent(&state, &set_view(ViewId::Timeline)).await;
    assert_eq!(listener_count(&state).await, 0);
}

#[tokio::test]
async fn lagging_listener_keeps_subscription_but_loses_overflow() {
    let state = ViewState::default();
    let (_id, mut rx) = subscribe(&state).await;

    let overflow = 3;
    for _ in 0..LISTENER_CHANNEL_CAPACITY + overflow {
        apply_intent(&state, &set_view(ViewId::Dashboard)).await;
    }

    assert_eq!(listener_count(&state).await, 1);
    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, LISTENER_CHANNEL_CAPACITY);
}
