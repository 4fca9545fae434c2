mod config;
mod diff;
mod errors;
mod export;
mod ingest;
mod llm_client;
mod optimizer;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::default_export_config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_key.clone(), config.groq_api_url.clone())?;
    info!(
        "LLM client initialized (model: {})",
        llm_client::MODEL_INSTANT
    );

    // Export layout: A4 for both LaTeX and PDF
    let export_config = default_export_config();
    info!(
        "Export config: PDF {}x{}mm, LaTeX {} {}pt",
        export_config.pdf.page_width_mm,
        export_config.pdf.page_height_mm,
        export_config.latex.paper,
        export_config.latex.font_size_pt
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        config: config.clone(),
        export_config,
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
