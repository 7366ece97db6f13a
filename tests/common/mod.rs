//! Common test utilities.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::Mutex;

use domainqa::agent::{Agent, AgentError, AgentFactory};
use domainqa::config::{Config, GOOGLE_API_KEY, TAVILY_API_KEY};
use domainqa::server::{self, AppState};
use domainqa::session::SessionRegistry;

/// Agent stub that numbers its replies by memory depth, so tests can
/// observe resets through the HTTP surface alone.
pub struct MockAgent {
    memory: Mutex<Vec<String>>,
}

#[async_trait]
impl Agent for MockAgent {
    async fn respond(&self, message: &str) -> Result<String, AgentError> {
        let mut memory = self.memory.lock().await;
        memory.push(message.to_string());
        Ok(format!("echo {}: {}", memory.len(), message))
    }

    async fn reset(&self) {
        self.memory.lock().await.clear();
    }
}

pub struct MockFactory;

impl AgentFactory for MockFactory {
    fn create(&self) -> Arc<dyn Agent> {
        Arc::new(MockAgent {
            memory: Mutex::new(Vec::new()),
        })
    }
}

pub fn test_config() -> Arc<Config> {
    let config = Config::from_lookup(|key| match key {
        GOOGLE_API_KEY => Some("g-key".to_string()),
        TAVILY_API_KEY => Some("t-key".to_string()),
        _ => None,
    })
    .unwrap();
    Arc::new(config)
}

/// Create a test app backed by mock agents, along with its registry.
pub fn test_app() -> (Router, SessionRegistry) {
    let config = test_config();
    let sessions = SessionRegistry::new(Arc::new(MockFactory));

    let state = AppState {
        config,
        sessions: sessions.clone(),
    };

    (server::build_app(state, 30), sessions)
}
