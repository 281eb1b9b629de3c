mod analysis;
mod config;
mod drafting;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod routes;
mod state;
mod text;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed numeric vars abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting decline API v{}", env!("CARGO_PKG_VERSION"));

    if config.ai_enabled() {
        info!(
            "LLM drafting enabled (provider: {}, model: {}, timeout: {}s)",
            config.llm.provider, config.llm.model, config.llm.timeout_secs
        );
    } else {
        warn!(
            "{} is not set; analysis and drafting will use templates only",
            config.llm.provider.key_var()
        );
    }
    info!(
        "Letterhead: {} / {}",
        config.letterhead.foundation_name, config.letterhead.signoff
    );

    let state = AppState::from_config(config.clone())?;

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
