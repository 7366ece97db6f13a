//! The per-session question-answering agent.
//!
//! The QA engine itself (search, retrieval, model calls) sits behind the
//! [`Agent`] trait; the session layer only ever sees `respond` and `reset`.

mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiAgent, GeminiAgentFactory};

// ============================================================================
// AgentError
// ============================================================================

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("llm request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("llm api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("llm returned no choices")]
    EmptyResponse,
}

// ============================================================================
// Agent Trait
// ============================================================================

/// Capability interface to the question-answering engine.
///
/// One instance exists per session and holds that session's private
/// conversational memory.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer a user message, extending this session's memory.
    async fn respond(&self, message: &str) -> Result<String, AgentError>;

    /// Discard all conversational memory for this session.
    async fn reset(&self);
}

/// Constructs agent instances for the session registry.
///
/// The registry is the only caller; handlers never build agents directly.
pub trait AgentFactory: Send + Sync {
    fn create(&self) -> Arc<dyn Agent>;
}
