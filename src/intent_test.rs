use super::*;
use serde_json::json;

#[test]
fn decode_set_view_uses_kebab_case_view_ids() {
    let intent = decode_intent(r#"{"type":"set_view","view_id":"customer-detail"}"#).unwrap();
    assert_eq!(intent, Intent::SetView { view_id: ViewId::CustomerDetail });
}

#[test]
fn decode_render_chart_reads_camel_case_fields() {
    let text = r#"{"type":"render_chart","containerId":"c1","chartConfig":{"kind":"bar"},"title":"Revenue"}"#;
    let intent = decode_intent(text).unwrap();
    assert_eq!(
        intent,
        Intent::RenderChart {
            container_id: "c1".into(),
            chart_config: json!({"kind": "bar"}),
            title: Some("Revenue".into()),
            description: None,
        }
    );
}

#[test]
fn decode_add_component_without_props() {
    let intent = decode_intent(r#"{"type":"add_component","id":"w1","component":"WorkflowProgress"}"#).unwrap();
    assert_eq!(
        intent,
        Intent::AddComponent { id: "w1".into(), component: "WorkflowProgress".into(), props: None }
    );
}

#[test]
fn decode_unknown_type_is_not_an_error() {
    let intent = decode_intent(r#"{"type":"nonexistent_intent","anything":1}"#).unwrap();
    assert_eq!(intent, Intent::Unknown);
    assert_eq!(intent.kind(), "unknown");
}

#[test]
fn decode_rejects_invalid_json() {
    let err = decode_intent("{not json").unwrap_err();
    assert!(matches!(err, IntentError::Json(_)));
    assert_eq!(err.error_code(), "E_INTENT_JSON");
}

#[test]
fn decode_rejects_non_object() {
    let err = decode_intent("[1,2,3]").unwrap_err();
    assert!(matches!(err, IntentError::NotAnObject));
}

#[test]
fn decode_rejects_missing_or_non_string_type() {
    assert!(matches!(decode_intent(r#"{"panel":"NotesPanel"}"#), Err(IntentError::MissingType)));
    assert!(matches!(decode_intent(r#"{"type":7}"#), Err(IntentError::MissingType)));
}

#[test]
fn decode_rejects_view_outside_closed_set() {
    let err = decode_intent(r#"{"type":"set_view","view_id":"settings"}"#).unwrap_err();
    match err {
        IntentError::Payload { kind, .. } => assert_eq!(kind, "set_view"),
        other => panic!("expected payload error, got {other:?}"),
    }
}

#[test]
fn decode_rejects_known_type_with_missing_fields() {
    let err = decode_intent(r#"{"type":"update_component_props","id":"x"}"#).unwrap_err();
    assert_eq!(err.error_code(), "E_INTENT_PAYLOAD");
}

#[test]
fn view_id_parses_every_wire_form() {
    for view in ViewId::ALL {
        let parsed: ViewId = view.as_str().parse().unwrap();
        assert_eq!(parsed, view);
        assert_eq!(serde_json::to_value(view).unwrap(), json!(view.as_str()));
    }
    assert!("nope".parse::<ViewId>().is_err());
}

#[test]
fn serialized_intent_carries_wire_tag() {
    let intent = Intent::RemovePanel { panel: "NotesPanel".into() };
    let value = serde_json::to_value(&intent).unwrap();
    assert_eq!(value, json!({"type": "remove_panel", "panel": "NotesPanel"}));
}
