//! Stub adapters and helpers shared by the integration suites.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use wireloom::adapters::vector::MemoryVectorStore;
use wireloom::adapters::{AdapterError, ChatModel, EmbeddingModel};
use wireloom::config::{EngineConfig, ExecutionSpeed};
use wireloom::engine::Engine;
use wireloom::store::GraphStore;

/// Chat stub that always answers with the same text, counting calls.
pub struct FixedChat {
    reply: String,
    pub calls: AtomicUsize,
}

impl FixedChat {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for FixedChat {
    async fn complete(
        &self,
        _api_key: &str,
        _system_prompt: &str,
        _user_message: &str,
        _want_json: bool,
    ) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Chat stub that always fails with the given message.
pub struct FailingChat {
    message: String,
}

impl FailingChat {
    pub fn new(message: &str) -> Arc<Self> {
        Arc::new(Self {
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(
        &self,
        _api_key: &str,
        _system_prompt: &str,
        _user_message: &str,
        _want_json: bool,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::Provider {
            provider: "stub",
            message: self.message.clone(),
        })
    }
}

/// Embedding stub backed by a fixed text→vector table. Unknown texts embed
/// to the zero vector.
#[derive(Default)]
pub struct TableEmbeddings {
    table: HashMap<String, Vec<f32>>,
}

impl TableEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, embedding: &[f32]) -> Self {
        self.table.insert(text.to_string(), embedding.to_vec());
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl EmbeddingModel for TableEmbeddings {
    async fn embed(&self, _api_key: &str, text: &str) -> Result<Vec<f32>, AdapterError> {
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; 3]))
    }
}

/// Embedding stub that always fails.
pub struct FailingEmbeddings;

#[async_trait]
impl EmbeddingModel for FailingEmbeddings {
    async fn embed(&self, _api_key: &str, _text: &str) -> Result<Vec<f32>, AdapterError> {
        Err(AdapterError::Provider {
            provider: "stub",
            message: "embedding backend down".to_string(),
        })
    }
}

pub fn realtime_config() -> EngineConfig {
    EngineConfig::new("test-key").with_speed(ExecutionSpeed::Realtime)
}

/// Engine with the given chat stub, table embeddings, a fresh in-memory
/// vector store, and realtime pacing.
pub fn engine_with_chat(store: Arc<GraphStore>, chat: Arc<dyn ChatModel>) -> Engine {
    Engine::new(
        store,
        chat,
        TableEmbeddings::new().into_arc(),
        Arc::new(MemoryVectorStore::new()),
        realtime_config(),
    )
}
