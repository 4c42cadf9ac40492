mod compatibility;
mod config;
mod enrichment;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compatibility::orchestrator::Orchestrator;
use crate::config::Config;
use crate::enrichment::LeetCodeClient;
use crate::llm_client::LlmClient;
use crate::models::compatibility::DISCLAIMER;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

/// Upper bound on how often idle sessions are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResuMatch API v{}", env!("CARGO_PKG_VERSION"));
    info!("Disclaimer: {DISCLAIMER}");

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), &config.gemini_api_base_url)
        .context("Failed to build LLM HTTP client")?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("GEMINI_API_KEY is not set; every analysis will fail until it is configured");
    }

    // Initialize profile enrichment client
    let profiles = LeetCodeClient::new(config.profile_api_base_url.clone())
        .context("Failed to build profile HTTP client")?;
    info!("Profile client initialized ({})", config.profile_api_base_url);

    // Session store plus its idle-session sweeper
    let sessions = SessionStore::new(config.session_ttl);
    let _sweeper = sessions.spawn_sweeper(config.session_ttl.min(MAX_SWEEP_INTERVAL));
    info!("Sessions expire after {}s idle", config.session_ttl.as_secs());

    // Build app state
    let state = AppState {
        sessions,
        orchestrator: Orchestrator::new(Arc::new(llm), Arc::new(profiles)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
