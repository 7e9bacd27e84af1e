use super::*;
use crate::intent::{ViewId, decode_intent};
use crate::registry::{Change, IgnoreReason};
use crate::services::render::subscribe;
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

async fn recv_event(rx: &mut mpsc::Receiver<RenderEvent>) -> RenderEvent {
    timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("render event timed out")
        .expect("channel closed")
}

fn assert_no_event(rx: &mut mpsc::Receiver<RenderEvent>) {
    assert!(rx.try_recv().is_err(), "expected no render event");
}

#[tokio::test]
async fn applied_intent_publishes_render_event() {
    let state = ViewState::default();
    let (_id, mut rx) = subscribe(&state).await;

    let outcome = apply_intent(&state, &Intent::SetView { view_id: ViewId::Triage }).await;
    assert_eq!(outcome, Outcome::Applied(Change::ViewSet(ViewId::Triage)));

    let event = recv_event(&mut rx).await;
    assert_eq!(event, RenderEvent { seq: 1, intent: "set_view", current_view: ViewId::Triage });
}

#[tokio::test]
async fn ignored_intent_publishes_nothing() {
    let state = ViewState::default();
    let (_id, mut rx) = subscribe(&state).await;

    let outcome = apply_intent(&state, &Intent::RemoveComponent { id: "missing".into() }).await;
    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::ComponentNotFound { id: "missing".into() }));
    assert_no_event(&mut rx);
}

#[tokio::test]
async fn unknown_intent_leaves_snapshot_unchanged() {
    let state = ViewState::default();
    let before = serde_json::to_string(&snapshot(&state).await).unwrap();

    let intent = decode_intent(r#"{"type":"nonexistent_intent"}"#).unwrap();
    let outcome = apply_intent(&state, &intent).await;

    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::UnknownIntent));
    assert_eq!(serde_json::to_string(&snapshot(&state).await).unwrap(), before);
}

#[tokio::test]
async fn events_follow_apply_order() {
    let state = ViewState::default();
    let (_id, mut rx) = subscribe(&state).await;

    apply_intent(&state, &Intent::SetView { view_id: ViewId::Dashboard }).await;
    apply_intent(
        &state,
        &Intent::RenderChart {
            container_id: "c".into(),
            chart_config: serde_json::json!({}),
            title: None,
            description: None,
        },
    )
    .await;

    let first = recv_event(&mut rx).await;
    let second = recv_event(&mut rx).await;
    assert_eq!((first.seq, first.current_view), (1, ViewId::Dashboard));
    assert_eq!((second.seq, second.intent, second.current_view), (2, "render_chart", ViewId::Analytics));
}

#[tokio::test]
async fn concurrent_producers_keep_add_panel_idempotent() {
    let state = ViewState::default();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            apply_intent(&state, &Intent::AddPanel { panel: "Shared".into() }).await
        }));
    }

    let mut applied = 0;
    for handle in handles {
        if handle.await.unwrap().is_applied() {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    let reg = snapshot(&state).await;
    assert_eq!(reg.current_layout(), ["EntityList", "Shared"]);
}
