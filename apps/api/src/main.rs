mod auth;
mod chat;
mod config;
mod directory;
mod documents;
mod errors;
mod layout;
mod models;
mod registration;
mod routes;
mod state;
mod tracker;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::{CompletionBackend, CompletionClient};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NutriCare API v{}", env!("CARGO_PKG_VERSION"));

    let chat: Option<Arc<dyn CompletionBackend>> = match &config.completion_api_key {
        Some(key) => {
            let client = CompletionClient::new(
                &config.completion_api_url,
                key.clone(),
                config.completion_model.clone(),
            );
            info!("Completion client initialized (model: {})", client.model());
            let backend: Arc<dyn CompletionBackend> = Arc::new(client);
            Some(backend)
        }
        None => {
            warn!("COMPLETION_API_KEY not set; chat is disabled");
            None
        }
    };

    let state = AppState::new(&config, chat);
    info!(
        "Page config: {}x{}mm, margin {}mm, body {}pt",
        state.page_config.width_mm,
        state.page_config.height_mm,
        state.page_config.margin_mm,
        state.page_config.body_font_size_pt
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
