//! Unit tests for the flow data model, ingestion and error types.
mod common;
use mailflow::prelude::*;

#[test]
fn test_node_kind_tags() {
    assert_eq!(NodeKind::Email.to_string(), "email");
    assert_eq!(NodeKind::LeadSource.as_ref(), "leadSource");
    assert_eq!("delay".parse::<NodeKind>(), Ok(NodeKind::Delay));
    assert!("Delay".parse::<NodeKind>().is_err());
    assert_eq!(NodeKind::LeadSource.label(), "Lead Source");
}

#[test]
fn test_graph_rejects_dangling_edges() {
    let err = FlowGraph::new(
        vec![Node::email("email-1", "Hi", "Body")],
        vec![Edge::new("email-1", "missing")],
    )
    .unwrap_err();
    assert_eq!(
        err,
        GraphError::MalformedGraph {
            edge_index: 0,
            missing_node_id: "missing".to_string(),
        }
    );
}

#[test]
fn test_graph_rejects_duplicate_ids() {
    let err = FlowGraph::new(
        vec![
            Node::email("node-1", "Hi", "Body"),
            Node::lead_source("node-1", "a@b.co"),
        ],
        vec![],
    )
    .unwrap_err();
    assert_eq!(err, GraphError::DuplicateNodeId("node-1".to_string()));
}

#[test]
fn test_graph_lookup() {
    let flow = common::create_simple_flow();
    assert_eq!(flow.node("delay-2").map(Node::kind), Some(NodeKind::Delay));
    assert!(flow.node("nope").is_none());
    assert_eq!(flow.nodes_of_kind(NodeKind::Email).count(), 1);
}

#[test]
fn test_next_node_id_follows_canvas_scheme() {
    let flow = common::create_simple_flow();
    assert_eq!(flow.next_node_id(NodeKind::Email), "email-4");

    // Skips ids that are already taken.
    let flow = FlowGraph::new(
        vec![
            Node::email("email-2", "Hi", "Body"),
            Node::email("email-1", "Hi", "Body"),
        ],
        vec![],
    )
    .unwrap();
    assert_eq!(flow.next_node_id(NodeKind::Email), "email-3");
    assert_eq!(FlowGraph::default().next_node_id(NodeKind::Delay), "delay-1");
}

#[test]
fn test_new_nodes_start_with_type_defaults() {
    match NodeData::default_for(NodeKind::Delay) {
        NodeData::Delay(data) => {
            assert_eq!(data.delay, 1.0);
            assert_eq!(data.unit, DelayUnit::Days);
        }
        other => panic!("Expected delay data, got {:?}", other),
    }
    assert_eq!(NodeData::default_for(NodeKind::Email).kind(), NodeKind::Email);
}

#[test]
fn test_snapshot_json_shape() {
    let flow = common::create_simple_flow();
    let value: serde_json::Value = serde_json::from_str(&flow.to_json().unwrap()).unwrap();

    assert_eq!(value["nodes"][0]["id"], "email-1");
    assert_eq!(value["nodes"][0]["type"], "email");
    assert_eq!(value["nodes"][0]["data"]["subject"], "Welcome");
    assert_eq!(value["nodes"][1]["data"]["unit"], "hours");
    assert_eq!(value["nodes"][2]["type"], "leadSource");
    assert_eq!(value["edges"][0]["source"], "delay-2");
    assert!(value["edges"][0].get("id").is_none());
}

#[test]
fn test_missing_arrays_load_as_empty_flow() {
    let flow = FlowGraph::from_json("{}").unwrap();
    assert!(flow.is_empty());
    assert!(flow.edges().is_empty());
}

#[test]
fn test_invalid_json_is_reported() {
    let err = FlowGraph::from_json("{ nodes: ").unwrap_err();
    assert!(matches!(err, GraphError::JsonParseError(_)));

    let err = FlowGraph::from_json(r#"{"nodes":[{"id":"d","type":"delay","data":{"delay":"soon"}}]}"#)
        .unwrap_err();
    assert!(err.to_string().contains("'d'"));
}

#[test]
fn test_error_display() {
    let err = ValidationError::InvalidEmailNode {
        node_id: "email-7".to_string(),
        field: EmailField::Body,
    };
    assert!(err.to_string().contains("email-7"));
    assert!(err.to_string().contains("body"));
    assert_eq!(err.node_id(), Some("email-7"));

    let err = ValidationError::IncompleteFlow(NodeKind::LeadSource);
    assert!(err.to_string().contains("leadSource"));
    assert_eq!(err.node_id(), None);

    let err = DispatchError::Submission {
        node_id: "email-2".to_string(),
        submitted: vec!["email-1".to_string()],
        source: SubmitError::Transport("connection reset".to_string()),
    };
    assert!(err.to_string().contains("email-2"));
    assert!(err.to_string().contains("connection reset"));

    let err = SaveError::Resolution {
        source: ResolutionError::MissingLeadSource("x".to_string()),
        submitted: vec![],
    };
    assert!(err.to_string().contains("lead source"));
    assert_eq!(err.user_message(), "Failed to save flow and schedule emails");
}
