//! Snapshot round-trip behavior.

use wireloom::node::{GraphNode, NodeState};
use wireloom::serialization::{export_to_json, import_from_json, serialize_state};
use wireloom::store::{GraphStore, Wire};

fn populated_store() -> GraphStore {
    let store = GraphStore::new();

    let console = GraphNode::console(0.0, 0.0).with_id("c");
    let mut llm = GraphNode::llm(250.0, 0.0).with_id("l");
    if let NodeState::Llm(state) = &mut llm.state {
        state.prompt = "answer tersely".to_string();
        state.structured_output = true;
        state.error = Some("previous failure".to_string());
    }
    let mut case = GraphNode::case(500.0, 0.0).with_id("k");
    if let NodeState::Case(state) = &mut case.state {
        state.case_key = "kind".to_string();
        state.value_key = "payload".to_string();
        state.cases = vec!["a".to_string(), "b".to_string()];
    }
    let mut end = GraphNode::end(750.0, 0.0).with_id("e");
    if let NodeState::End(state) = &mut end.state {
        state.value = "final".to_string();
    }
    let vs = GraphNode::vectordb_store(0.0, 200.0).with_id("vs");
    let vr = GraphNode::vectordb_retrieve(250.0, 200.0).with_id("vr");

    assert!(store.add_wire(Wire::link(&console, &llm)));
    assert!(store.add_wire(Wire::link(&llm, &end)));
    assert!(store.add_wire(Wire::link(&vs, &vr)));
    store.add_node(console);
    store.add_node(llm);
    store.add_node(case);
    store.add_node(end);
    store.add_node(vs);
    store.add_node(vr);
    store
}

#[test]
fn round_trip_reproduces_every_node_and_wire() {
    let store = populated_store();
    store.set_selected_node(Some("l".to_string()));
    store.set_active_node(Some("c".to_string()));

    let json = export_to_json(&store).expect("export succeeds");

    let restored = GraphStore::new();
    import_from_json(&restored, &json).expect("import succeeds");

    let before = store.snapshot();
    let after = restored.snapshot();
    assert_eq!(before.nodes, after.nodes);
    assert_eq!(before.wires, after.wires);

    // live pointers are never persisted
    assert_eq!(restored.selected_node(), None);
    assert_eq!(restored.active_node(), None);
}

#[test]
fn import_replaces_previous_contents() {
    let store = populated_store();
    let json = export_to_json(&store).expect("export succeeds");

    let target = GraphStore::new();
    target.add_node(GraphNode::end(0.0, 0.0).with_id("stale"));
    import_from_json(&target, &json).expect("import succeeds");

    assert!(target.node("stale").is_none());
    assert_eq!(target.node_count(), store.node_count());
}

#[test]
fn exported_document_uses_the_flat_node_shape() {
    let store = populated_store();
    let json = export_to_json(&store).expect("export succeeds");
    let document: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    let nodes = document["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes.len(), 6);
    let llm = nodes
        .iter()
        .find(|n| n["id"] == "l")
        .expect("llm node present");
    assert_eq!(llm["type"], "llm");
    assert_eq!(llm["state"]["structuredOutput"], true);
    assert_eq!(llm["state"]["error"], "previous failure");

    let case = nodes
        .iter()
        .find(|n| n["id"] == "k")
        .expect("case node present");
    assert_eq!(case["state"]["caseKey"], "kind");
    assert_eq!(case["state"]["cases"], serde_json::json!(["a", "b"]));

    let wires = document["wires"].as_array().expect("wires array");
    assert_eq!(wires.len(), 3);
    assert!(wires.iter().all(|w| w["fromConnector"].is_string()));
}

#[test]
fn invalid_json_is_an_error_not_a_panic() {
    let store = GraphStore::new();
    assert!(import_from_json(&store, "{ not json").is_err());
    assert!(import_from_json(&store, r#"{"nodes": 3}"#).is_err());
    assert_eq!(store.node_count(), 0);
}

#[test]
fn serialize_state_captures_counts() {
    let store = populated_store();
    let state = serialize_state(&store);
    assert_eq!(state.nodes.len(), 6);
    assert_eq!(state.wires.len(), 3);
}
