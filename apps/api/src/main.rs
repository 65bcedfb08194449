mod config;
mod errors;
mod gate;
mod generation;
mod layout;
mod llm_client;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::generator::PackGenerator;
use crate::generation::retry::RetryPolicy;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TrendForge API v{}", env!("CARGO_PKG_VERSION"));

    // Output directory for PDFs and bulk archives; never cleaned up
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "could not create output directory {}",
            config.output_dir.display()
        )
    })?;
    info!("Writing packs to {}", config.output_dir.display());

    // Initialize LLM client (optional: no key means offline mode)
    let llm: Option<Arc<dyn TextGenerator>> = match &config.openai_api_key {
        Some(key) => {
            let client = LlmClient::new(
                key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => None,
    };
    if !config.ai_enabled() {
        warn!("OPENAI_API_KEY not set; packs will be built offline");
    }
    let generator = PackGenerator::new(llm, RetryPolicy::default());

    // Build app state (quota store, license client, PDF fonts)
    let state = AppState::new(config.clone(), generator);

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
