//! Asynchronous single-path propagation engine.
//!
//! [`Engine::run`] walks the graph from a starting node: resolve the node by
//! id, mark it active, pause for the configured pacing delay, dispatch on its
//! type, clear the active marker, and follow the single outgoing wire (if
//! any) with the produced value. Fan-out per output connector is capped at
//! one by the store, so every run is a linear chain of steps.
//!
//! The walk is an iterative trampoline rather than recursion: a wiring that
//! forms a cycle simply keeps looping. [`crate::config::EngineConfig::max_steps`]
//! optionally bounds that; the unbounded default mirrors the historical
//! behavior.
//!
//! Error containment is deliberately uneven across node types:
//! - llm failures are recorded in the node's own `error` field and end the
//!   chain as a normal outcome (`Ok`);
//! - vectordb adapter failures abort the chain as an [`EngineError`];
//! - case nodes log and terminate silently on bad input or configuration.
//!
//! Runs are cooperative: any number may be in flight, each interleaving at
//! its suspension points. They contend only on the cosmetic `active_node`
//! pointer — store mutations themselves are atomic snapshot replacements.

use std::sync::Arc;

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::adapters::vector::{VectorStore, VectorStoreError};
use crate::adapters::{AdapterError, ChatModel, EmbeddingModel};
use crate::config::EngineConfig;
use crate::node::{CaseState, GraphNode, LlmState, NodeState, case_connector_id};
use crate::store::GraphStore;

/// Unrecoverable failures that abort a propagation chain.
///
/// Chat-completion failures never appear here — they are contained in the
/// failing llm node's state.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("embedding request failed: {source}")]
    #[diagnostic(
        code(wireloom::engine::embedding),
        help("Check the API key and that the embedding provider is reachable.")
    )]
    Embedding {
        #[source]
        source: AdapterError,
    },

    #[error(transparent)]
    #[diagnostic(code(wireloom::engine::vector_store))]
    VectorStore(#[from] VectorStoreError),

    #[error("vector store returned no documents")]
    #[diagnostic(
        code(wireloom::engine::empty_vector_store),
        help("Run a vectordb-store node at least once before retrieving.")
    )]
    EmptyVectorStore,

    #[error("step limit of {limit} exceeded; the wiring likely forms a cycle")]
    #[diagnostic(code(wireloom::engine::step_limit))]
    StepLimitExceeded { limit: u64 },
}

/// Next node to call and the value to call it with.
struct Hop {
    node: String,
    value: String,
}

/// Graph walker: holds the shared store, the three service adapters, and the
/// run configuration. Cheap to share; all methods take `&self`.
pub struct Engine {
    store: Arc<GraphStore>,
    chat: Arc<dyn ChatModel>,
    embeddings: Arc<dyn EmbeddingModel>,
    vectors: Arc<dyn VectorStore>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        store: Arc<GraphStore>,
        chat: Arc<dyn ChatModel>,
        embeddings: Arc<dyn EmbeddingModel>,
        vectors: Arc<dyn VectorStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            chat,
            embeddings,
            vectors,
            config,
        }
    }

    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Propagate `input` through the graph starting at `start`.
    ///
    /// Each step resolves the current node by id at time of use, so a node
    /// deleted mid-run halts the chain naturally. The active-node pointer is
    /// set before the step's work and cleared exactly once afterwards, on
    /// every exit path.
    pub async fn run(&self, start: &str, input: impl Into<String>) -> Result<(), EngineError> {
        let mut next = Some(Hop {
            node: start.to_string(),
            value: input.into(),
        });
        let mut steps: u64 = 0;

        while let Some(hop) = next.take() {
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    return Err(EngineError::StepLimitExceeded { limit });
                }
            }
            steps += 1;

            let Some(node) = self.store.node(&hop.node) else {
                debug!(node = %hop.node, "node no longer in store; chain halts");
                break;
            };

            self.store.set_active_node(Some(node.id.clone()));
            self.pace().await;
            let outcome = self.step(&node, hop.value).await;
            self.store.set_active_node(None);

            next = outcome?;
        }
        Ok(())
    }

    /// Step pacing: a pure timing side effect. Zero delay suspends not at
    /// all, so realtime runs resolve without yielding to the timer.
    async fn pace(&self) {
        let delay = self.config.speed.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn step(&self, node: &GraphNode, input: String) -> Result<Option<Hop>, EngineError> {
        debug!(node = %node.id, kind = %node.state.node_type(), "executing node");
        match &node.state {
            // Consoles are sources; if one is ever called it forwards
            // unchanged.
            NodeState::Console(_) => Ok(self.forward(&node.id, input)),
            NodeState::Llm(llm) => self.call_llm(node, llm.clone(), input).await,
            NodeState::End(_) => {
                self.store.mutate_node(&node.id, move |n| {
                    if let NodeState::End(state) = &mut n.state {
                        state.value = input;
                    }
                });
                Ok(None)
            }
            NodeState::Case(case) => Ok(self.call_case(node, case, &input)),
            NodeState::VectordbStore => self.call_vector_store(node, input).await,
            NodeState::VectordbRetrieve => self.call_vector_retrieve(node, input).await,
        }
    }

    /// Resolve the single wire leaving `node_id`; `None` is a valid terminal
    /// state, not an error.
    fn forward(&self, node_id: &str, value: String) -> Option<Hop> {
        self.store.target_of(node_id).map(|node| Hop { node, value })
    }

    async fn call_llm(
        &self,
        node: &GraphNode,
        llm: LlmState,
        input: String,
    ) -> Result<Option<Hop>, EngineError> {
        self.store.mutate_node(&node.id, |n| {
            if let NodeState::Llm(state) = &mut n.state {
                state.loading = true;
                state.error = None;
            }
        });

        let outcome = self
            .chat
            .complete(
                &self.config.api_key,
                &llm.prompt,
                &input,
                llm.structured_output,
            )
            .await
            .and_then(|text| {
                if text.is_empty() {
                    Err(AdapterError::EmptyResponse)
                } else {
                    Ok(text)
                }
            });

        match outcome {
            Ok(text) => {
                self.store.mutate_node(&node.id, |n| {
                    if let NodeState::Llm(state) = &mut n.state {
                        state.loading = false;
                    }
                });
                Ok(self.forward(&node.id, text))
            }
            Err(err) => {
                error!(node = %node.id, %err, "chat completion failed");
                let message = err.to_string();
                self.store.mutate_node(&node.id, move |n| {
                    if let NodeState::Llm(state) = &mut n.state {
                        state.loading = false;
                        state.error = Some(message);
                    }
                });
                // Contained: the branch terminates at the failing node.
                Ok(None)
            }
        }
    }

    fn call_case(&self, node: &GraphNode, case: &CaseState, input: &str) -> Option<Hop> {
        let payload: Value = match serde_json::from_str(input) {
            Ok(payload) => payload,
            Err(err) => {
                error!(node = %node.id, %err, "case input is not valid JSON");
                return None;
            }
        };

        if case.case_key.is_empty() || case.value_key.is_empty() {
            warn!(node = %node.id, "case or value key not set");
            return None;
        }
        let Some(label) = payload.get(&case.case_key) else {
            warn!(node = %node.id, key = %case.case_key, "case key not found in input");
            return None;
        };
        let Some(value) = payload.get(&case.value_key) else {
            warn!(node = %node.id, key = %case.value_key, "value key not found in input");
            return None;
        };

        let connector = case_connector_id(&node.id, &label_text(label));
        // An unwired label is a dead branch, which is valid.
        let target = self.store.target_through_connector(&connector)?;
        Some(Hop {
            node: target,
            value: value.to_string(),
        })
    }

    async fn call_vector_store(
        &self,
        node: &GraphNode,
        input: String,
    ) -> Result<Option<Hop>, EngineError> {
        let embedding = self.embed(&input).await?;
        self.vectors.initialize().await?;
        self.vectors.insert(&input, &embedding).await?;
        Ok(self.forward(&node.id, input))
    }

    async fn call_vector_retrieve(
        &self,
        node: &GraphNode,
        input: String,
    ) -> Result<Option<Hop>, EngineError> {
        let embedding = self.embed(&input).await?;
        self.vectors.initialize().await?;
        let retrieved = self
            .vectors
            .query_nearest(&embedding)
            .await?
            .ok_or(EngineError::EmptyVectorStore)?;
        Ok(self.forward(&node.id, format!("{input}\n{retrieved}")))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        self.embeddings
            .embed(&self.config.api_key, text)
            .await
            .map_err(|source| EngineError::Embedding { source })
    }
}

/// Case labels match the way dynamic string coercion would render the JSON
/// value: bare text for strings, literal JSON otherwise (`42`, `true`).
fn label_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
