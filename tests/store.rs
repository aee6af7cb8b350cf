//! Structural invariants of the graph store.

use wireloom::node::{GraphNode, NodeState, case_connector_id, input_connector_id};
use wireloom::store::{GraphStore, Wire};

fn case_with_labels(id: &str, labels: &[&str]) -> GraphNode {
    let mut node = GraphNode::case(0.0, 0.0).with_id(id);
    if let NodeState::Case(state) = &mut node.state {
        state.case_key = "k".to_string();
        state.value_key = "v".to_string();
        state.cases = labels.iter().map(|l| l.to_string()).collect();
    }
    node
}

#[test]
fn second_wire_from_same_connector_is_rejected() {
    let store = GraphStore::new();
    let console = GraphNode::console(0.0, 0.0).with_id("c");
    let first = GraphNode::end(0.0, 0.0).with_id("e1");
    let second = GraphNode::end(0.0, 0.0).with_id("e2");

    assert!(store.add_wire(Wire::link(&console, &first)));
    assert!(!store.add_wire(Wire::link(&console, &second)));

    assert_eq!(store.wire_count(), 1);
    assert_eq!(store.target_of("c"), Some("e1".to_string()));
}

#[test]
fn distinct_connectors_may_each_carry_a_wire() {
    let store = GraphStore::new();
    let case = case_with_labels("k", &["a", "b"]);
    let x = GraphNode::end(0.0, 0.0).with_id("x");
    let y = GraphNode::end(0.0, 0.0).with_id("y");

    assert!(store.add_wire(Wire::new(
        "k",
        case_connector_id("k", "a"),
        "x",
        input_connector_id("x"),
    )));
    assert!(store.add_wire(Wire::new(
        "k",
        case_connector_id("k", "b"),
        "y",
        input_connector_id("y"),
    )));
    store.add_node(case);
    store.add_node(x);
    store.add_node(y);

    assert_eq!(store.wire_count(), 2);
    assert_eq!(
        store.target_through_connector(&case_connector_id("k", "a")),
        Some("x".to_string())
    );
    assert_eq!(
        store.target_through_connector(&case_connector_id("k", "b")),
        Some("y".to_string())
    );
}

#[test]
fn removing_a_node_cascades_to_its_wires() {
    let store = GraphStore::new();
    let console = GraphNode::console(0.0, 0.0).with_id("c");
    let llm = GraphNode::llm(0.0, 0.0).with_id("l");
    let end = GraphNode::end(0.0, 0.0).with_id("e");

    store.add_wire(Wire::link(&console, &llm));
    store.add_wire(Wire::link(&llm, &end));
    store.add_node(console);
    store.add_node(llm);
    store.add_node(end);

    store.remove_node("l");

    assert_eq!(store.node_count(), 2);
    assert_eq!(store.wire_count(), 0);
    assert!(store.wires().iter().all(|w| w.from_node != "l" && w.to_node != "l"));
}

#[test]
fn removing_selected_node_clears_selection() {
    let store = GraphStore::new();
    store.add_node(GraphNode::end(0.0, 0.0).with_id("e1"));
    store.add_node(GraphNode::end(0.0, 0.0).with_id("e2"));

    store.set_selected_node(Some("e1".to_string()));
    store.remove_node("e2");
    assert_eq!(store.selected_node(), Some("e1".to_string()));

    store.remove_node("e1");
    assert_eq!(store.selected_node(), None);
}

#[test]
fn case_connector_set_tracks_labels() {
    let node = case_with_labels("k", &["a", "b"]);
    let outputs: Vec<String> = node
        .connectors()
        .into_iter()
        .filter(|c| c.kind == wireloom::node::ConnectorKind::Output)
        .map(|c| c.id)
        .collect();
    assert_eq!(outputs, vec!["k-output-a".to_string(), "k-output-b".to_string()]);
}

#[test]
fn removing_case_label_drops_its_wire() {
    let store = GraphStore::new();
    let case = case_with_labels("k", &["a", "b"]);
    let x = GraphNode::end(0.0, 0.0).with_id("x");
    let y = GraphNode::end(0.0, 0.0).with_id("y");

    store.add_wire(Wire::new(
        "k",
        case_connector_id("k", "a"),
        "x",
        input_connector_id("x"),
    ));
    store.add_wire(Wire::new(
        "k",
        case_connector_id("k", "b"),
        "y",
        input_connector_id("y"),
    ));
    store.add_node(case.clone());
    store.add_node(x);
    store.add_node(y);

    let mut edited = case;
    if let NodeState::Case(state) = &mut edited.state {
        state.cases.retain(|label| label != "a");
    }
    store.update_node(edited);

    assert_eq!(store.wire_count(), 1);
    assert_eq!(
        store.target_through_connector(&case_connector_id("k", "a")),
        None
    );
    assert_eq!(
        store.target_through_connector(&case_connector_id("k", "b")),
        Some("y".to_string())
    );
}

#[test]
fn update_node_replaces_stored_value() {
    let store = GraphStore::new();
    store.add_node(GraphNode::end(0.0, 0.0).with_id("e"));

    store.mutate_node("e", |node| {
        if let NodeState::End(state) = &mut node.state {
            state.value = "done".to_string();
        }
    });

    match store.node("e").unwrap().state {
        NodeState::End(state) => assert_eq!(state.value, "done"),
        _ => panic!("unexpected node variant"),
    }
}

#[test]
fn add_node_overwrites_on_id_collision() {
    let store = GraphStore::new();
    store.add_node(GraphNode::end(0.0, 0.0).with_id("n"));
    store.add_node(GraphNode::llm(0.0, 0.0).with_id("n"));

    assert_eq!(store.node_count(), 1);
    assert!(matches!(store.node("n").unwrap().state, NodeState::Llm(_)));
}
