//! # Wireloom: Node-graph Execution Engine for Visual LLM Workflows
//!
//! Wireloom is the execution core of a canvas-style authoring tool: users
//! place typed nodes, wire outputs to inputs, and submit text at a console
//! node to push a value through the graph. This crate owns the graph data
//! model and the asynchronous propagation semantics; rendering, panels, and
//! pointer interaction live in a frontend that drives the same store.
//!
//! ## Core Concepts
//!
//! - **Nodes**: a closed set of typed variants ([`node::NodeState`]) with
//!   per-type mutable state
//! - **Wires**: directed edges between derived connector ids, at most one
//!   per output connector
//! - **Store**: copy-on-write single source of truth ([`store::GraphStore`])
//! - **Engine**: single-path async walker ([`engine::Engine`]) with pacing
//!   and per-node error containment
//! - **Adapters**: chat, embedding, and vector-store seams
//!   ([`adapters`]) behind async traits
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wireloom::adapters::openai::OpenAiClient;
//! use wireloom::adapters::vector::MemoryVectorStore;
//! use wireloom::config::EngineConfig;
//! use wireloom::engine::Engine;
//! use wireloom::node::GraphNode;
//! use wireloom::store::{GraphStore, Wire};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), wireloom::engine::EngineError> {
//! let store = Arc::new(GraphStore::new());
//!
//! let console = GraphNode::console(0.0, 0.0);
//! let llm = GraphNode::llm(250.0, 0.0);
//! let end = GraphNode::end(500.0, 0.0);
//! store.add_wire(Wire::link(&console, &llm));
//! store.add_wire(Wire::link(&llm, &end));
//! let console_id = console.id.clone();
//! store.add_node(console);
//! store.add_node(llm);
//! store.add_node(end);
//!
//! let client = Arc::new(OpenAiClient::new());
//! let engine = Engine::new(
//!     store,
//!     client.clone(),
//!     client,
//!     Arc::new(MemoryVectorStore::new()),
//!     EngineConfig::from_env(),
//! );
//! engine.run(&console_id, "hello").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`node`] - Node variants, state payloads, connector derivation
//! - [`store`] - Graph store, wires, structural invariants
//! - [`engine`] - Propagation loop and error containment
//! - [`adapters`] - Chat/embedding/vector-store seams and implementations
//! - [`serialization`] - Flat JSON snapshot and restore
//! - [`config`] - Execution speed and environment-backed configuration
//! - [`telemetry`] - Tracing subscriber setup

pub mod adapters;
pub mod config;
pub mod engine;
pub mod node;
pub mod serialization;
pub mod store;
pub mod telemetry;
