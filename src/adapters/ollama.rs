//! Ollama chat client.
//!
//! Talks to a local Ollama runtime through `POST /api/chat` with streaming off.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ChatMessage, LlmClient, ResponseFormat};
use crate::utils::error::{Result, TalentError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:latest";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    client: Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
            client: Client::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, Duration::from_secs(60))
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage], format: ResponseFormat) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            format: match format {
                ResponseFormat::Json => Some("json"),
                ResponseFormat::Text => None,
            },
        };

        tracing::debug!(
            "🤖 Ollama request: model={}, messages={}, format={:?}",
            self.model,
            messages.len(),
            format
        );

        let response = self
            .client
            .post(self.chat_url())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TalentError::llm(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        tracing::debug!("🤖 Ollama response: {} chars", parsed.message.content.len());
        Ok(parsed.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
