use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::service::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Launches one browser per render; holds no per-request state.
    pub renderer: PdfRenderer,
    /// `None` when no API key is configured; CV import then answers 503.
    pub llm: Option<LlmClient>,
}
