//! OpenAI-compatible HTTP client for completions and embeddings.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{AdapterError, ChatModel, EmbeddingModel};

const PROVIDER: &str = "openai";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const CHAT_MODEL: &str = "gpt-4o-mini-2024-07-18";
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Client for the chat-completions and embeddings endpoints.
///
/// The API key travels per call rather than per client, matching the
/// [`ChatModel`]/[`EmbeddingModel`] contracts — the key is user
/// configuration that can change between runs.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenAiClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint, e.g. a mock server or an
    /// OpenAI-compatible proxy.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn post(&self, api_key: &str, path: &str, payload: Value) -> Result<Value, AdapterError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|source| AdapterError::Http {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|source| AdapterError::Http {
            provider: PROVIDER,
            source,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        api_key: &str,
        system_prompt: &str,
        user_message: &str,
        want_json: bool,
    ) -> Result<String, AdapterError> {
        let response_format = if want_json {
            json!({"type": "json_object"})
        } else {
            json!({"type": "text"})
        };
        let payload = json!({
            "model": CHAT_MODEL,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_message},
            ],
            "response_format": response_format,
        });

        let body = self.post(api_key, "/chat/completions", payload).await?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if content.is_empty() {
            return Err(AdapterError::EmptyResponse);
        }
        Ok(content.to_string())
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiClient {
    async fn embed(&self, api_key: &str, text: &str) -> Result<Vec<f32>, AdapterError> {
        let payload = json!({
            "model": EMBEDDING_MODEL,
            "input": text,
        });
        let body = self.post(api_key, "/embeddings", payload).await?;
        let components = body
            .pointer("/data/0/embedding")
            .and_then(Value::as_array)
            .ok_or_else(|| AdapterError::Malformed {
                provider: PROVIDER,
                message: "missing embedding vector".to_string(),
            })?;

        components
            .iter()
            .map(|component| {
                component
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| AdapterError::Malformed {
                        provider: PROVIDER,
                        message: "non-numeric embedding component".to_string(),
                    })
            })
            .collect()
    }
}
