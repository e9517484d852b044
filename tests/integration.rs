//! Integration tests for mailflow
//!
//! End-to-end tests that run the full save pipeline: ingest, validate,
//! persist, resolve and dispatch.
//!
mod common;
use common::*;
use mailflow::prelude::*;

const CANVAS_FLOW_JSON: &str = r#"{
    "nodes": [
        { "id": "email-1", "type": "email", "position": { "x": 10, "y": 20 },
          "data": { "subject": "Intro", "body": "Hello there" } },
        { "id": "delay-2", "type": "delay", "position": { "x": 0, "y": 0 },
          "data": { "delay": 30, "unit": "minutes" } },
        { "id": "leadSource-3", "type": "leadSource", "position": { "x": 0, "y": 0 },
          "data": { "email": "lead@example.com", "source": "Webinar" } }
    ],
    "edges": [
        { "id": "reactflow__edge-delay-2-email-1", "source": "delay-2", "target": "email-1",
          "sourceHandle": null, "targetHandle": null },
        { "id": "reactflow__edge-leadSource-3-email-1", "source": "leadSource-3", "target": "email-1" }
    ],
    "viewport": { "x": 0, "y": 0, "zoom": 1 }
}"#;

fn session(recorder: &Recorder) -> FlowSession<MemoryStore, impl JobSubmitter + use<>> {
    FlowSession::new(MemoryStore::new(), recorder.accepting())
        .with_credential(Some(Credential::new("token")))
}

#[test]
fn test_canvas_snapshot_is_saved_and_scheduled() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    let report = session.save_json(CANVAS_FLOW_JSON).expect("Failed to save");

    assert_eq!(report.submitted, ["email-1"]);
    assert_eq!(report.message(), "Flow saved and emails scheduled successfully!");
    assert_eq!(recorder.recipients(), ["lead@example.com"]);
    assert_eq!(recorder.payloads.borrow()[0].delay, 1_800_000);

    let stored = session.load().expect("Failed to load");
    assert_eq!(stored.nodes().len(), 3);
    assert_eq!(stored.edges().len(), 2);
    assert!(session.store().raw(DEFAULT_FLOW_KEY).is_some());
}

#[test]
fn test_invalid_flow_is_neither_stored_nor_dispatched() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    let flow = FlowGraph::new(
        vec![
            Node::email("email-1", "Hi", "Body"),
            Node::lead_source("lead-1", "a@b.co"),
        ],
        vec![Edge::new("lead-1", "email-1")],
    )
    .unwrap();

    let err = session.save(&flow).unwrap_err();
    assert!(matches!(
        err,
        SaveError::Validation(ValidationError::IncompleteFlow(NodeKind::Delay))
    ));
    assert_eq!(err.user_message(), "Failed to save flow and schedule emails");
    assert!(session.store().raw(DEFAULT_FLOW_KEY).is_none());
    assert_eq!(recorder.len(), 0);
}

#[test]
fn test_earlier_jobs_stay_scheduled_when_later_node_fails_resolution() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    let err = session
        .save(&create_partially_connected_flow())
        .unwrap_err();

    match &err {
        SaveError::Resolution { source, submitted } => {
            assert_eq!(
                source,
                &ResolutionError::MissingLeadSource("email-b".to_string())
            );
            assert_eq!(submitted, &["email-a"]);
        }
        other => panic!("Expected Resolution error, got {:?}", other),
    }
    assert_eq!(err.submitted(), ["email-a"]);
    assert_eq!(recorder.recipients(), ["first@example.com"]);
}

#[test]
fn test_submission_failure_reports_already_scheduled_jobs() {
    let recorder = Recorder::default();
    let mut session = FlowSession::new(MemoryStore::new(), recorder.failing_at(2))
        .with_credential(Some(Credential::new("token")));

    let err = session.save(&create_sequence_flow()).unwrap_err();

    assert!(matches!(
        &err,
        SaveError::Dispatch(DispatchError::Submission { node_id, .. }) if node_id == "email-3"
    ));
    assert_eq!(err.submitted(), ["email-1", "email-2"]);
    // The snapshot was persisted before dispatch began.
    assert!(session.store().raw(DEFAULT_FLOW_KEY).is_some());
}

#[test]
fn test_missing_credential_stops_before_dispatch() {
    let recorder = Recorder::default();
    let mut session = FlowSession::new(MemoryStore::new(), recorder.accepting());

    let err = session.save(&create_simple_flow()).unwrap_err();
    assert!(matches!(
        err,
        SaveError::Dispatch(DispatchError::MissingCredential)
    ));
    assert_eq!(recorder.len(), 0);

    session.set_credential(Credential::from_optional(Some("fresh".to_string())));
    assert!(session.save(&create_simple_flow()).is_ok());
    assert_eq!(recorder.tokens.borrow().as_slice(), ["fresh"]);
}

#[test]
fn test_cleared_delay_blocks_the_save() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    let json = CANVAS_FLOW_JSON.replace(r#""delay": 30"#, r#""delay": null"#);
    let err = session.save_json(&json).unwrap_err();

    assert!(matches!(
        err,
        SaveError::Validation(ValidationError::InvalidDelayNode(ref id)) if id == "delay-2"
    ));
    assert!(session.store().raw(DEFAULT_FLOW_KEY).is_none());
    assert_eq!(recorder.len(), 0);
}

#[test]
fn test_cleared_subject_blocks_the_save() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    let json = CANVAS_FLOW_JSON.replace(r#""subject": "Intro""#, r#""subject": null"#);
    let err = session.save_json(&json).unwrap_err();

    assert_eq!(
        err.to_string(),
        ValidationError::InvalidEmailNode {
            node_id: "email-1".to_string(),
            field: EmailField::Subject,
        }
        .to_string()
    );
    assert_eq!(recorder.len(), 0);
}

#[test]
fn test_malformed_snapshot_is_rejected() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    let json = r#"{
        "nodes": [{ "id": "email-1", "type": "email", "data": {} }],
        "edges": [{ "source": "ghost", "target": "email-1" }]
    }"#;
    let err = session.save_json(json).unwrap_err();
    assert!(matches!(
        err,
        SaveError::Graph(GraphError::MalformedGraph { edge_index: 0, ref missing_node_id })
            if missing_node_id == "ghost"
    ));
}

#[test]
fn test_save_options_are_applied() {
    let recorder = Recorder::default();
    let mut session = session(&recorder).with_options(SaveOptions {
        key: "campaign-7".to_string(),
        flow_id: Some("flow-7".to_string()),
    });

    session.save(&create_simple_flow()).unwrap();

    assert!(session.store().raw("campaign-7").is_some());
    assert!(session.store().raw(DEFAULT_FLOW_KEY).is_none());
    assert_eq!(
        recorder.payloads.borrow()[0].flow_id.as_deref(),
        Some("flow-7")
    );
}

#[test]
fn test_file_store_session_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut session = FlowSession::new(JsonFileStore::new(dir.path()), recorder.accepting())
        .with_credential(Some(Credential::new("token")));

    assert!(session.load().unwrap().is_empty());
    session.save(&create_sequence_flow()).unwrap();

    let reloaded = session.load().unwrap();
    assert_eq!(reloaded, create_sequence_flow());
    assert_eq!(recorder.len(), 3);
}
