//! Service seams consumed by the execution engine.
//!
//! The engine talks to the outside world through three thin traits: a
//! chat-completion provider ([`ChatModel`]), an embedding provider
//! ([`EmbeddingModel`]), and a similarity store
//! ([`vector::VectorStore`]). Production wiring uses [`openai::OpenAiClient`]
//! for the first two and [`vector::MemoryVectorStore`] for the third; tests
//! substitute stubs.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

pub mod openai;
pub mod vector;

/// Failures from chat or embedding providers.
#[derive(Debug, Error, Diagnostic)]
pub enum AdapterError {
    /// The request never produced a response (network, TLS, timeout).
    #[error("request to {provider} failed: {source}")]
    #[diagnostic(code(wireloom::adapters::http))]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    #[diagnostic(
        code(wireloom::adapters::api),
        help("Inspect the response body for the provider's error message.")
    )]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// A completion arrived without any content.
    #[error("No response content received")]
    #[diagnostic(code(wireloom::adapters::empty_response))]
    EmptyResponse,

    /// The response parsed but did not have the expected shape.
    #[error("malformed {provider} response: {message}")]
    #[diagnostic(code(wireloom::adapters::malformed))]
    Malformed {
        provider: &'static str,
        message: String,
    },

    /// Generic provider failure, mainly for test doubles and wrappers.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(wireloom::adapters::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },
}

/// One-shot chat completion: a system prompt plus a single user message.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the assistant's text (or JSON text when `want_json`).
    async fn complete(
        &self,
        api_key: &str,
        system_prompt: &str,
        user_message: &str,
        want_json: bool,
    ) -> Result<String, AdapterError>;
}

/// Text-to-vector embedding used by both vectordb node types.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, api_key: &str, text: &str) -> Result<Vec<f32>, AdapterError>;
}
