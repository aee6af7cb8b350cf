//! Vector similarity store shared by the vectordb node types.
//!
//! The store is process-wide: created once, lazily initialized on first use
//! by whichever vectordb node runs first, and reused by every later run.
//! [`MemoryVectorStore`] is the in-process implementation; the trait exists
//! so a persistent index can be swapped in without touching the engine.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;
use tokio::sync::Mutex;

/// Failures from the similarity store.
#[derive(Debug, Error, Diagnostic)]
pub enum VectorStoreError {
    #[error("vector store not initialized")]
    #[diagnostic(
        code(wireloom::vector::not_initialized),
        help("Call initialize() before inserting or querying.")
    )]
    NotInitialized,
}

/// Embedding-indexed document store.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the backing index if it does not exist yet. Idempotent: later
    /// calls observe the existing index and return.
    async fn initialize(&self) -> Result<(), VectorStoreError>;

    /// Insert a document with its embedding.
    async fn insert(&self, content: &str, embedding: &[f32]) -> Result<(), VectorStoreError>;

    /// Content of the single most similar document by cosine ordering, or
    /// `None` when the store holds no documents.
    async fn query_nearest(&self, embedding: &[f32]) -> Result<Option<String>, VectorStoreError>;
}

#[derive(Clone, Debug)]
struct StoredDocument {
    content: String,
    embedding: Vec<f32>,
}

/// In-memory similarity index with lazy, null-checked initialization.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    documents: Mutex<Option<Vec<StoredDocument>>>,
}

impl MemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn initialize(&self) -> Result<(), VectorStoreError> {
        let mut documents = self.documents.lock().await;
        if documents.is_none() {
            *documents = Some(Vec::new());
        }
        Ok(())
    }

    async fn insert(&self, content: &str, embedding: &[f32]) -> Result<(), VectorStoreError> {
        let mut documents = self.documents.lock().await;
        let documents = documents.as_mut().ok_or(VectorStoreError::NotInitialized)?;
        documents.push(StoredDocument {
            content: content.to_string(),
            embedding: embedding.to_vec(),
        });
        Ok(())
    }

    async fn query_nearest(&self, embedding: &[f32]) -> Result<Option<String>, VectorStoreError> {
        let documents = self.documents.lock().await;
        let documents = documents.as_ref().ok_or(VectorStoreError::NotInitialized)?;

        let mut best: Option<(&StoredDocument, f32)> = None;
        for document in documents {
            let score = cosine_similarity(embedding, &document.embedding);
            match best {
                // Earlier documents win ties.
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((document, score)),
            }
        }
        Ok(best.map(|(document, _)| document.content.clone()))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
