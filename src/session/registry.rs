//! Session registry mapping tokens to agent instances.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use thiserror::Error;
use tracing::info;

use crate::agent::{Agent, AgentFactory};

// ============================================================================
// RegistryError
// ============================================================================

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session registry is not initialized")]
    NotInitialized,
}

// ============================================================================
// SessionRegistry
// ============================================================================

/// Process-wide mapping from session token to agent instance.
///
/// Agents are created lazily on first use of a token; the `DashMap` entry
/// API makes insert-if-absent atomic, so concurrent first requests for one
/// token produce exactly one instance. Thread-safe and cheap to clone.
#[derive(Clone)]
pub struct SessionRegistry {
    factory: Arc<dyn AgentFactory>,
    agents: Arc<DashMap<String, Arc<dyn Agent>>>,
    /// Cleared by `clear_all`; a closed registry refuses to resolve.
    open: Arc<AtomicBool>,
}

impl SessionRegistry {
    pub fn new(factory: Arc<dyn AgentFactory>) -> Self {
        Self {
            factory,
            agents: Arc::new(DashMap::new()),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get the agent for a token, creating it on first use.
    ///
    /// This is the only path to obtaining an agent instance.
    pub fn resolve(&self, token: &str) -> Result<Arc<dyn Agent>, RegistryError> {
        if !self.open.load(Ordering::Acquire) {
            return Err(RegistryError::NotInitialized);
        }

        let agent = self
            .agents
            .entry(token.to_string())
            .or_insert_with(|| {
                info!(session_id = %token, "Creating agent instance for new session");
                self.factory.create()
            })
            .clone();

        Ok(agent)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Release every agent instance and close the registry.
    ///
    /// Invoked once during shutdown. Afterwards `resolve` fails with
    /// `NotInitialized` rather than silently creating orphaned instances.
    pub fn clear_all(&self) {
        self.open.store(false, Ordering::Release);

        for entry in self.agents.iter() {
            info!(session_id = %entry.key(), "Releasing session");
        }
        self.agents.clear();

        info!("Session registry cleared");
    }
}

// ============================================================================
// Tests
// ============================================================================
