//! Summit assistant - chat backend for the summitEHR marketing site
//!
//! Hosts one chat session per visitor and answers each question with a
//! single call to the Gemini API.

mod api;
mod assistant;
mod config;
mod llm;
mod session;
mod system_prompt;

use api::{create_router, AppState};
use assistant::ResponseGenerator;
use config::Config;
use llm::{GeminiService, LlmService, LoggingService};
use session::SessionRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use system_prompt::SystemPrompt;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "summit_assistant=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;

    if config.api_key.is_none() && config.gateway.is_none() {
        tracing::warn!(
            "No API key configured. Set GEMINI_API_KEY or LLM_GATEWAY; replies will use the fallback message."
        );
    }

    let prompt = SystemPrompt::load(config.system_prompt_path.as_deref())?;
    tracing::info!(source = ?prompt.source(), chars = prompt.text().len(), "System prompt loaded");

    // Initialize LLM client once; every session shares it
    let gemini = GeminiService::new(
        config.api_key.clone(),
        &config.model,
        config.gateway.as_deref(),
        config.request_timeout,
    )?;
    let llm: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(gemini)));
    tracing::info!(
        model = %llm.model_id(),
        gateway = config.gateway.is_some(),
        timeout_secs = config.request_timeout.as_secs(),
        "LLM client initialized"
    );

    let generator = Arc::new(ResponseGenerator::new(llm, prompt));
    let sessions = Arc::new(SessionRegistry::new(generator, config.session_ttl));
    let _sweeper = sessions.spawn_sweeper(SWEEP_INTERVAL);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(AppState::new(sessions))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Summit assistant listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
