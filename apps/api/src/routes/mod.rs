pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};

use crate::content::handlers as content;
use crate::import::handlers as import;
use crate::render::handlers as render;
use crate::state::AppState;

pub const RENDER_PATH: &str = "/api/generate-pdf";

pub fn build_router(state: AppState) -> Router {
    // The render route answers its own preflight with 204; every other
    // response from it still carries the wildcard origin.
    let render_routes = Router::new()
        .route(
            RENDER_PATH,
            post(render::handle_generate_pdf).options(render::handle_preflight),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ));

    let api_routes = Router::new()
        .route(
            "/api/v1/import-cv",
            post(import::handle_import_cv)
                .layer(DefaultBodyLimit::max(state.config.max_payload_bytes)),
        )
        .route("/api/v1/content/slugs", get(content::handle_list_slugs))
        .route("/api/v1/glossary", get(content::handle_list_glossary))
        .route("/api/v1/glossary/:slug", get(content::handle_get_glossary_term))
        .route("/api/v1/job-titles", get(content::handle_list_job_titles))
        .route("/api/v1/job-titles/:slug", get(content::handle_get_job_title))
        .route("/api/v1/alternatives", get(content::handle_list_alternatives))
        .route("/api/v1/alternatives/:slug", get(content::handle_get_alternative))
        .route("/api/v1/blog", get(content::handle_list_blog_posts))
        .route("/api/v1/blog/:slug", get(content::handle_get_blog_post))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(render_routes)
        .merge(api_routes)
        .with_state(state)
}
