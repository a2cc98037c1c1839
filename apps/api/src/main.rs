mod config;
mod content;
mod errors;
mod import;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::browser::NetworkIdle;
use crate::render::chromium::ChromiumLauncher;
use crate::render::service::{PdfRenderer, RenderSettings};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; invalid values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV API v{}", env!("CARGO_PKG_VERSION"));

    // One Chromium process per render; nothing is pooled
    let launcher = Arc::new(ChromiumLauncher::new(config.chrome_path.clone()));
    let settings = RenderSettings {
        render_timeout: config.render_timeout,
        network_idle: NetworkIdle::with_timeout(config.network_idle_timeout),
        emulate_screen_media_for_print: config.emulate_screen_media,
    };
    info!(
        "PDF renderer ready (timeout {:?}, screen media: {})",
        settings.render_timeout, settings.emulate_screen_media_for_print
    );
    let renderer = PdfRenderer::new(launcher, settings);

    // Initialize LLM client (optional — CV import is disabled without a key)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; CV import disabled");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        renderer,
        llm,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
