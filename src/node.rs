//! Node model and connector registry for the wireloom graph.
//!
//! A [`GraphNode`] couples an opaque id and canvas position with a
//! [`NodeState`]: a closed tagged union over the supported node variants.
//! The variant determines the node's connector topology and its execution
//! behavior (dispatched exhaustively in [`crate::engine`]). Adding a node
//! type is a single coordinated edit: the union here, the connector match
//! here, and the dispatch match in the engine — never an open hierarchy.
//!
//! Connector identifiers are derived purely from the node id and the
//! connector role (`{id}-input`, `{id}-output`, `{id}-output-{label}`), so a
//! connector can be resolved without holding a live node reference.
//!
//! # Examples
//!
//! ```
//! use wireloom::node::{GraphNode, NodeState, NodeType};
//!
//! let node = GraphNode::llm(120.0, 40.0);
//! assert_eq!(node.state.node_type(), NodeType::Llm);
//! assert_eq!(node.input_connector(), Some(format!("{}-input", node.id)));
//!
//! let case = GraphNode::case(0.0, 0.0);
//! if let NodeState::Case(state) = &case.state {
//!     assert!(state.cases.is_empty());
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// Canvas dimensions per node type; only the connector anchor math depends on
// these, rendering itself lives outside this crate.
const LLM_WIDTH: f64 = 120.0;
const CONSOLE_SIZE: f64 = 150.0;
const END_WIDTH: f64 = 120.0;
const CASE_WIDTH: f64 = 80.0;
const CASE_HEIGHT: f64 = 150.0;
const VECTORDB_WIDTH: f64 = 150.0;

/// Derived identifier of a node's input connector.
#[must_use]
pub fn input_connector_id(node_id: &str) -> String {
    format!("{node_id}-input")
}

/// Derived identifier of a single-output node's output connector.
#[must_use]
pub fn output_connector_id(node_id: &str) -> String {
    format!("{node_id}-output")
}

/// Derived identifier of a case node's output connector for one case label.
#[must_use]
pub fn case_connector_id(node_id: &str, label: &str) -> String {
    format!("{node_id}-output-{label}")
}

/// A node on the canvas: identity, position, and variant-specific state.
///
/// The `id` is stable for the node's lifetime and unique within a store;
/// fresh nodes get random v4 UUIDs from the per-variant constructors.
/// Position is carried for connector geometry only — the engine never reads
/// it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub state: NodeState,
}

/// Closed set of node variants with their mutable per-type payload.
///
/// Serializes adjacently tagged as `{"type": ..., "state": ...}` with
/// kebab-case type tags, reproducing the flat JSON snapshot shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "state", rename_all = "kebab-case")]
pub enum NodeState {
    /// Source node; submitting text at its console starts a run.
    Console(ConsoleState),
    /// Chat-completion call with a stored system prompt.
    Llm(LlmState),
    /// Terminal sink recording the last value it received.
    End(EndState),
    /// JSON-keyed branch with one output connector per case label.
    Case(CaseState),
    /// Embeds its input and inserts it into the vector store.
    VectordbStore,
    /// Embeds its input and prepends the nearest stored document.
    VectordbRetrieve,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleState {
    pub prompt: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmState {
    /// System prompt sent with every completion.
    pub prompt: String,
    /// Request JSON-object output instead of free text.
    pub structured_output: bool,
    /// True while a completion is in flight; always cleared afterwards.
    pub loading: bool,
    /// Failure message from the last run, if it failed.
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EndState {
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseState {
    /// JSON key whose value selects the branch.
    pub case_key: String,
    /// JSON key whose value is forwarded along the branch.
    pub value_key: String,
    /// Unique-by-value labels; order is connector order.
    pub cases: Vec<String>,
}

/// Bare discriminant of a [`NodeState`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Console,
    Llm,
    End,
    Case,
    VectordbStore,
    VectordbRetrieve,
}

impl NodeType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Llm => "llm",
            Self::End => "end",
            Self::Case => "case",
            Self::VectordbStore => "vectordb-store",
            Self::VectordbRetrieve => "vectordb-retrieve",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl NodeState {
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Console(_) => NodeType::Console,
            Self::Llm(_) => NodeType::Llm,
            Self::End(_) => NodeType::End,
            Self::Case(_) => NodeType::Case,
            Self::VectordbStore => NodeType::VectordbStore,
            Self::VectordbRetrieve => NodeType::VectordbRetrieve,
        }
    }
}

/// Whether a connector accepts or emits values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorKind {
    Input,
    Output,
}

/// One port of a node, identified by its derived id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connector {
    pub id: String,
    pub kind: ConnectorKind,
}

/// A connector placed at concrete screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl GraphNode {
    fn with_state(x: f64, y: f64, state: NodeState) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            x,
            y,
            state,
        }
    }

    #[must_use]
    pub fn console(x: f64, y: f64) -> Self {
        Self::with_state(x, y, NodeState::Console(ConsoleState::default()))
    }

    #[must_use]
    pub fn llm(x: f64, y: f64) -> Self {
        Self::with_state(x, y, NodeState::Llm(LlmState::default()))
    }

    #[must_use]
    pub fn end(x: f64, y: f64) -> Self {
        Self::with_state(x, y, NodeState::End(EndState::default()))
    }

    #[must_use]
    pub fn case(x: f64, y: f64) -> Self {
        Self::with_state(x, y, NodeState::Case(CaseState::default()))
    }

    #[must_use]
    pub fn vectordb_store(x: f64, y: f64) -> Self {
        Self::with_state(x, y, NodeState::VectordbStore)
    }

    #[must_use]
    pub fn vectordb_retrieve(x: f64, y: f64) -> Self {
        Self::with_state(x, y, NodeState::VectordbRetrieve)
    }

    /// Replace the generated id, mainly for deterministic test graphs.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Input connector id, if this variant has an input.
    #[must_use]
    pub fn input_connector(&self) -> Option<String> {
        match self.state.node_type() {
            NodeType::Console => None,
            _ => Some(input_connector_id(&self.id)),
        }
    }

    /// Output connector id for single-output variants. Case nodes derive
    /// their outputs per label (see [`case_connector_id`]); end nodes have
    /// none.
    #[must_use]
    pub fn output_connector(&self) -> Option<String> {
        match self.state.node_type() {
            NodeType::Console | NodeType::Llm | NodeType::VectordbStore | NodeType::VectordbRetrieve => {
                Some(output_connector_id(&self.id))
            }
            NodeType::End | NodeType::Case => None,
        }
    }

    /// Every connector this node currently exposes.
    ///
    /// For case nodes the output set tracks the `cases` labels exactly, so
    /// editing labels adds and removes connectors in lockstep.
    #[must_use]
    pub fn connectors(&self) -> Vec<Connector> {
        let output = |id: String| Connector {
            id,
            kind: ConnectorKind::Output,
        };
        let input = |id: String| Connector {
            id,
            kind: ConnectorKind::Input,
        };
        match &self.state {
            NodeState::Console(_) => vec![output(output_connector_id(&self.id))],
            NodeState::Llm(_) | NodeState::VectordbStore | NodeState::VectordbRetrieve => vec![
                input(input_connector_id(&self.id)),
                output(output_connector_id(&self.id)),
            ],
            NodeState::End(_) => vec![input(input_connector_id(&self.id))],
            NodeState::Case(state) => {
                let mut connectors = vec![input(input_connector_id(&self.id))];
                connectors.extend(
                    state
                        .cases
                        .iter()
                        .map(|label| output(case_connector_id(&self.id, label))),
                );
                connectors
            }
        }
    }

    /// Connector positions relative to a screen anchor at the node center.
    ///
    /// Case outputs are spaced evenly down the right edge in label order.
    #[must_use]
    pub fn connectors_at(&self, screen_x: f64, screen_y: f64) -> Vec<ConnectorPosition> {
        let at = |id: String, x: f64, y: f64| ConnectorPosition { id, x, y };
        match &self.state {
            NodeState::Console(_) => vec![at(
                output_connector_id(&self.id),
                screen_x + CONSOLE_SIZE / 2.0,
                screen_y,
            )],
            NodeState::Llm(_) => vec![
                at(
                    input_connector_id(&self.id),
                    screen_x - LLM_WIDTH / 2.0,
                    screen_y,
                ),
                at(
                    output_connector_id(&self.id),
                    screen_x + LLM_WIDTH / 2.0,
                    screen_y,
                ),
            ],
            NodeState::End(_) => vec![at(
                input_connector_id(&self.id),
                screen_x - END_WIDTH / 2.0,
                screen_y,
            )],
            NodeState::Case(state) => {
                let mut positions = vec![at(
                    input_connector_id(&self.id),
                    screen_x - CASE_WIDTH / 2.0,
                    screen_y,
                )];
                let spacing = CASE_HEIGHT / (state.cases.len() as f64 + 1.0);
                positions.extend(state.cases.iter().enumerate().map(|(index, label)| {
                    at(
                        case_connector_id(&self.id, label),
                        screen_x + CASE_WIDTH / 2.0,
                        screen_y - CASE_HEIGHT / 2.0 + spacing * (index as f64 + 1.0),
                    )
                }));
                positions
            }
            NodeState::VectordbStore | NodeState::VectordbRetrieve => vec![
                at(
                    input_connector_id(&self.id),
                    screen_x - VECTORDB_WIDTH / 2.0,
                    screen_y,
                ),
                at(
                    output_connector_id(&self.id),
                    screen_x + VECTORDB_WIDTH / 2.0,
                    screen_y,
                ),
            ],
        }
    }
}
