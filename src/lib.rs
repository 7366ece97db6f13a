//! Domainqa - session-scoped HTTP server for a domain-specific Q&A agent.

pub mod agent;
pub mod api;
pub mod build_info;
pub mod config;
pub mod handlers;
pub mod server;
pub mod session;
