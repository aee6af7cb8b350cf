//! Flat JSON snapshot and restore of the graph store.
//!
//! The document is `{"nodes": [...], "wires": [...]}`. Selection pointers
//! are deliberately absent: they are live references, and import resets both
//! to `None`.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::GraphNode;
use crate::store::{GraphStore, Wire};

/// On-disk shape of a graph snapshot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SerializedState {
    pub nodes: Vec<GraphNode>,
    pub wires: Vec<Wire>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum SerializationError {
    #[error(transparent)]
    #[diagnostic(
        code(wireloom::serialization::serde),
        help("The document must be an object with nodes and wires arrays.")
    )]
    Serde(#[from] serde_json::Error),
}

/// Capture the store's nodes and wires. Element order is not meaningful.
#[must_use]
pub fn serialize_state(store: &GraphStore) -> SerializedState {
    let snapshot = store.snapshot();
    SerializedState {
        nodes: snapshot.nodes.into_values().collect(),
        wires: snapshot.wires.into_values().collect(),
    }
}

/// Replace the store contents with a snapshot, resetting both selection
/// pointers.
pub fn deserialize_state(store: &GraphStore, state: SerializedState) {
    store.restore(state.nodes, state.wires);
}

pub fn export_to_json(store: &GraphStore) -> Result<String, SerializationError> {
    Ok(serde_json::to_string_pretty(&serialize_state(store))?)
}

pub fn import_from_json(store: &GraphStore, json: &str) -> Result<(), SerializationError> {
    let parsed: SerializedState = serde_json::from_str(json)?;
    deserialize_state(store, parsed);
    Ok(())
}
