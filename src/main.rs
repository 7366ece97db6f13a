use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use domainqa::agent::GeminiAgentFactory;
use domainqa::config::Config;
use domainqa::server::{self, AppState};
use domainqa::session::SessionRegistry;

// ============================================================================
// CLI Types
// ============================================================================

/// Domainqa - session-scoped HTTP server for a domain-specific Q&A agent
#[derive(Parser, Debug)]
#[command(version = domainqa::build_info::VERSION, about, long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    // Fatal on invalid credentials; the process must not serve traffic.
    let config = Arc::new(Config::from_env().context("environment validation failed")?);
    config.log_resolved();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.llm_timeout))
        .build()
        .context("failed to build HTTP client")?;

    let factory = GeminiAgentFactory::new(client, config.clone());
    let sessions = SessionRegistry::new(Arc::new(factory));
    info!("Session registry initialized");

    let state = AppState {
        config: config.clone(),
        sessions: sessions.clone(),
    };
    let app = server::build_app(state, config.request_timeout);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, "Starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Release every agent instance before exiting.
    sessions.clear_all();

    info!("Server stopped");
    Ok(())
}

// ============================================================================
// Initialization
// ============================================================================

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
