//! Single source of truth for nodes and wires.
//!
//! [`GraphStore`] owns the canonical id→node and id→wire maps plus the two
//! cross-cutting pointers (`selected_node` for UI focus, `active_node` for
//! the step the engine is currently executing). Every accessor clones data
//! out and every mutation replaces stored values wholesale, so a caller that
//! took a [`StoreSnapshot`] before an await point keeps a consistent view
//! while the store changes underneath — the execution engine depends on
//! exactly this property across its suspension points.
//!
//! Structural invariants enforced here:
//! - at most one wire leaves any output connector ([`GraphStore::add_wire`]
//!   rejects violations as a no-op);
//! - removing a node cascades to every wire touching it;
//! - updating a node drops wires attached to connectors the update removed
//!   (case labels).
//!
//! Operations on unknown ids are no-ops; lookups return `None`. The store
//! never panics.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::node::{GraphNode, input_connector_id, output_connector_id};

/// Directed edge from a source node's output connector to a target node's
/// input connector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub from_node: String,
    pub from_connector: String,
    pub to_node: String,
    pub to_connector: String,
}

impl Wire {
    /// Wire between explicit connectors, with a fresh id.
    #[must_use]
    pub fn new(
        from_node: impl Into<String>,
        from_connector: impl Into<String>,
        to_node: impl Into<String>,
        to_connector: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_node: from_node.into(),
            from_connector: from_connector.into(),
            to_node: to_node.into(),
            to_connector: to_connector.into(),
        }
    }

    /// Wire from a single-output node's output to another node's input,
    /// deriving both connector ids.
    #[must_use]
    pub fn link(from: &GraphNode, to: &GraphNode) -> Self {
        Self::new(
            from.id.clone(),
            output_connector_id(&from.id),
            to.id.clone(),
            input_connector_id(&to.id),
        )
    }
}

/// Owned, point-in-time copy of the store contents.
#[derive(Clone, Debug, Default)]
pub struct StoreSnapshot {
    pub nodes: FxHashMap<String, GraphNode>,
    pub wires: FxHashMap<String, Wire>,
    pub selected_node: Option<String>,
    pub active_node: Option<String>,
}

/// Canonical graph state with copy-on-write mutation semantics.
///
/// Constructed once at application start and shared (typically behind an
/// `Arc`) between the engine and any frontend; tests create a fresh instance
/// each. All methods take `&self` — mutation goes through an interior lock
/// whose critical sections never suspend.
#[derive(Debug, Default)]
pub struct GraphStore {
    inner: RwLock<StoreSnapshot>,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreSnapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreSnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Owned copy of the full store contents.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read().clone()
    }

    /// Insert a node; an id collision overwrites the previous node.
    /// Callers wanting fresh nodes use the [`GraphNode`] constructors, which
    /// generate UUID ids.
    pub fn add_node(&self, node: GraphNode) {
        self.write().nodes.insert(node.id.clone(), node);
    }

    /// Remove a node and every wire referencing it in either direction.
    /// Clears `selected_node` if it pointed at the removed node. No-op on
    /// unknown ids.
    pub fn remove_node(&self, id: &str) {
        let mut state = self.write();
        if state.nodes.remove(id).is_none() {
            return;
        }
        state
            .wires
            .retain(|_, wire| wire.from_node != id && wire.to_node != id);
        if state.selected_node.as_deref() == Some(id) {
            state.selected_node = None;
        }
    }

    /// Insert a wire unless its `from_connector` already feeds another wire.
    ///
    /// The one-wire-per-output-connector rule is what keeps propagation
    /// single-path: a rejected insert leaves the wire set unchanged and
    /// returns `false`.
    pub fn add_wire(&self, wire: Wire) -> bool {
        let mut state = self.write();
        if state
            .wires
            .values()
            .any(|existing| existing.from_connector == wire.from_connector)
        {
            tracing::warn!(
                connector = %wire.from_connector,
                "output connector already wired; ignoring new wire"
            );
            return false;
        }
        state.wires.insert(wire.id.clone(), wire);
        true
    }

    /// Remove a wire by id; no cascade, no-op on unknown ids.
    pub fn remove_wire(&self, id: &str) {
        self.write().wires.remove(id);
    }

    /// Replace a stored node by value.
    ///
    /// Ownership transfer means the caller cannot alias the stored copy
    /// afterwards. Wires attached to connectors the updated node no longer
    /// exposes (a removed case label) are dropped immediately.
    pub fn update_node(&self, node: GraphNode) {
        let connector_ids: Vec<String> = node.connectors().into_iter().map(|c| c.id).collect();
        let id = node.id.clone();
        let mut state = self.write();
        state.nodes.insert(node.id.clone(), node);
        state.wires.retain(|_, wire| {
            (wire.from_node != id || connector_ids.contains(&wire.from_connector))
                && (wire.to_node != id || connector_ids.contains(&wire.to_connector))
        });
    }

    /// Fetch-modify-replace in one call: clones the node out, applies `f`,
    /// and stores the result through [`Self::update_node`]. Returns whether
    /// the node existed.
    pub fn mutate_node(&self, id: &str, f: impl FnOnce(&mut GraphNode)) -> bool {
        let Some(mut node) = self.node(id) else {
            return false;
        };
        f(&mut node);
        self.update_node(node);
        true
    }

    /// Last-write-wins UI focus pointer; not validated against the node map.
    pub fn set_selected_node(&self, id: Option<String>) {
        self.write().selected_node = id;
    }

    /// Last-write-wins pointer to the node the engine is executing.
    pub fn set_active_node(&self, id: Option<String>) {
        self.write().active_node = id;
    }

    #[must_use]
    pub fn selected_node(&self) -> Option<String> {
        self.read().selected_node.clone()
    }

    #[must_use]
    pub fn active_node(&self) -> Option<String> {
        self.read().active_node.clone()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<GraphNode> {
        self.read().nodes.get(id).cloned()
    }

    #[must_use]
    pub fn wire(&self, id: &str) -> Option<Wire> {
        self.read().wires.get(id).cloned()
    }

    /// All nodes; iteration order is not meaningful.
    #[must_use]
    pub fn nodes(&self) -> Vec<GraphNode> {
        self.read().nodes.values().cloned().collect()
    }

    /// All wires; iteration order is not meaningful.
    #[must_use]
    pub fn wires(&self) -> Vec<Wire> {
        self.read().wires.values().cloned().collect()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.read().nodes.len()
    }

    #[must_use]
    pub fn wire_count(&self) -> usize {
        self.read().wires.len()
    }

    /// Target node id of the wire leaving `node_id`, if any.
    ///
    /// Meaningful for single-output nodes; case branches resolve through
    /// [`Self::target_through_connector`] instead.
    #[must_use]
    pub fn target_of(&self, node_id: &str) -> Option<String> {
        self.read()
            .wires
            .values()
            .find(|wire| wire.from_node == node_id)
            .map(|wire| wire.to_node.clone())
    }

    /// Target node id of the wire leaving the given output connector, if any.
    #[must_use]
    pub fn target_through_connector(&self, connector_id: &str) -> Option<String> {
        self.read()
            .wires
            .values()
            .find(|wire| wire.from_connector == connector_id)
            .map(|wire| wire.to_node.clone())
    }

    /// Replace the whole graph, e.g. after a snapshot import. Both selection
    /// pointers reset to `None`; they are never persisted as live references.
    pub fn restore(&self, nodes: Vec<GraphNode>, wires: Vec<Wire>) {
        let mut state = self.write();
        state.nodes = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        state.wires = wires.into_iter().map(|w| (w.id.clone(), w)).collect();
        state.selected_node = None;
        state.active_node = None;
    }
}
