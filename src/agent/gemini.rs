//! Gemini-backed agent using the OpenAI-compatible chat completions API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;

use super::{Agent, AgentError, AgentFactory};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const MODEL: &str = "gemini-2.0-flash";

const SYSTEM_PROMPT: &str =
    "You are a helpful domain question-answering assistant. Answer concisely \
     and base your answers on the conversation so far.";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: &'static str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

// ============================================================================
// GeminiAgent
// ============================================================================

/// One conversational agent, owning its session's message history.
pub struct GeminiAgent {
    client: Client,
    config: Arc<Config>,
    memory: Mutex<Vec<Message>>,
}

impl GeminiAgent {
    #[must_use]
    pub fn new(client: Client, config: Arc<Config>) -> Self {
        Self {
            client,
            config,
            memory: Mutex::new(Vec::new()),
        }
    }

    async fn chat(&self, messages: Vec<Message>) -> Result<Message, AgentError> {
        let request = ChatCompletionRequest {
            model: MODEL,
            messages,
            temperature: self.config.llm_temperature,
            max_tokens: self.config.llm_max_tokens,
        };

        let response = self
            .client
            .post(format!("{BASE_URL}/chat/completions"))
            .header(
                "Authorization",
                format!("Bearer {}", self.config.google_api_key),
            )
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AgentError::Api { status, message });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(AgentError::EmptyResponse)
    }
}

#[async_trait]
impl Agent for GeminiAgent {
    async fn respond(&self, message: &str) -> Result<String, AgentError> {
        // Hold the lock across the call so memory stays consistent with the
        // request that was sent.
        let mut memory = self.memory.lock().await;

        let mut messages = Vec::with_capacity(memory.len() + 2);
        messages.push(Message::new("system", SYSTEM_PROMPT));
        messages.extend(memory.iter().cloned());
        messages.push(Message::new("user", message));

        let reply = self.chat(messages).await?;
        let text = reply.content.clone();

        memory.push(Message::new("user", message));
        memory.push(reply);
        debug!(turns = memory.len() / 2, "Conversation turn completed");

        Ok(text)
    }

    async fn reset(&self) {
        self.memory.lock().await.clear();
    }
}

// ============================================================================
// GeminiAgentFactory
// ============================================================================

/// Builds one [`GeminiAgent`] per session, sharing a pooled HTTP client and
/// the process-wide configuration.
pub struct GeminiAgentFactory {
    client: Client,
    config: Arc<Config>,
}

impl GeminiAgentFactory {
    #[must_use]
    pub fn new(client: Client, config: Arc<Config>) -> Self {
        Self { client, config }
    }
}

impl AgentFactory for GeminiAgentFactory {
    fn create(&self) -> Arc<dyn Agent> {
        Arc::new(GeminiAgent::new(self.client.clone(), self.config.clone()))
    }
}

// ============================================================================
// Tests
// ============================================================================
