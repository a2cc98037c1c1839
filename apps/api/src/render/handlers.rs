//! Axum handlers for the PDF render endpoint.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;

use crate::render::error::RenderError;
use crate::render::request::RenderRequest;
use crate::render::service::RenderedDocument;
use crate::state::AppState;

const FALLBACK_DISPOSITION: &str = "attachment; filename=\"cv.pdf\"";

/// POST /api/generate-pdf
///
/// Body: `{ html, filename?, margin? }` or `{ content, styles?, filename?, margin? }`.
/// Returns the PDF as an attachment, or a plain-text error.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    match generate(&state, &headers, body).await {
        Ok(document) => pdf_response(document),
        Err(e) => e.into_response(),
    }
}

/// OPTIONS /api/generate-pdf
pub async fn handle_preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

async fn generate(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<RenderedDocument, RenderError> {
    let limit = state.config.max_payload_bytes;

    if declared_length(headers).is_some_and(|len| len > limit as u64) {
        return Err(RenderError::PayloadTooLarge { limit });
    }

    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        if e.into_inner().downcast_ref::<LengthLimitError>().is_some() {
            RenderError::PayloadTooLarge { limit }
        } else {
            RenderError::InvalidRequest
        }
    })?;

    // serde's message names the offending field and position.
    let request: RenderRequest = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!("Rejected render request body: {e}");
        RenderError::InvalidRequest
    })?;
    let job = request.into_job()?;

    state.renderer.render(job).await
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn pdf_response(document: RenderedDocument) -> Response {
    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename=\"{}\"", document.filename).as_bytes(),
    )
    .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_DISPOSITION));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(document.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.pdf,
    )
        .into_response()
}
