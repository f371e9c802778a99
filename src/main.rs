//! Adaptive persuasion engine
//!
//! Serves closed-loop donation dialogues over HTTP. Each session tracks
//! listener belief and trust, adapts its persuasion strategy, and stops
//! itself when the listener accepts, refuses, or loses trust.

mod api;
mod config;
mod engine;
mod generation;
mod llm;
mod session;

use api::{create_router, AppState};
use config::{EngineConfig, ServerConfig};
use generation::LlmGenerator;
use llm::{LlmConfig, LlmService, LoggingService, OpenAiCompatService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adaptive_persuasion=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let server_config = ServerConfig::from_env();
    let engine_config = EngineConfig::from_env()?;
    tracing::info!(config = ?engine_config, "Engine configuration loaded");

    let llm_config = LlmConfig::from_env();
    if llm_config.api_key.is_none() {
        tracing::warn!("HF_TOKEN not set; agent replies will use fallback lines");
    }
    let provider: Arc<dyn LlmService> = Arc::new(OpenAiCompatService::new(&llm_config)?);
    let service: Arc<dyn LlmService> = Arc::new(LoggingService::new(provider));
    tracing::info!(
        model = %service.model_id(),
        endpoint = %llm_config.endpoint,
        "Generation service initialized"
    );

    let generator = Arc::new(LlmGenerator::new(service, &llm_config));
    let state = AppState::new(engine_config, generator);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    tracing::info!("Persuasion server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
