mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ScorerBackend};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::external::DEFAULT_MAX_ATTEMPTS;
use crate::scoring::{AtsScorer, Backoff, ExternalScorer, FrequencyScorer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ats_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    let scorer = build_scorer(&config)?;
    info!("Scorer backend: {}", scorer.backend());

    let state = AppState {
        config: config.clone(),
        scorer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the scoring strategy: keyword overlap by default, model-backed when configured.
fn build_scorer(config: &Config) -> Result<Arc<dyn AtsScorer>> {
    match config.scorer_backend {
        ScorerBackend::Keyword => Ok(Arc::new(FrequencyScorer)),
        ScorerBackend::Llm => {
            let api_key = config
                .cohere_api_key
                .clone()
                .context("COHERE_API_KEY is required for the llm scorer")?;
            let llm = LlmClient::new(api_key).context("Failed to build LLM client")?;
            info!(
                "LLM client initialized (model: {}, retry base delay: {}ms)",
                llm_client::MODEL,
                config.retry_base_delay.as_millis()
            );

            Ok(Arc::new(ExternalScorer::new(
                Arc::new(llm),
                Backoff {
                    base_delay: config.retry_base_delay,
                    max_attempts: DEFAULT_MAX_ATTEMPTS,
                },
            )))
        }
    }
}
