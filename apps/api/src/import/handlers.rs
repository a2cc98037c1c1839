//! Axum route handler for the CV import API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::import::{extract_pdf_text, import_cv_text};
use crate::models::resume::ImportedResume;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub resume: ImportedResume,
    /// "pdf" or "text" — which form field the CV came from.
    pub source: &'static str,
}

enum CvSource {
    Pdf(Bytes),
    Text(String),
}

/// POST /api/v1/import-cv
///
/// Multipart form with either a `file` field (PDF) or a `text` field.
pub async fn handle_import_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let limit = state.config.max_payload_bytes;
    let source = read_source(multipart, limit).await?;

    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("ANTHROPIC_API_KEY is not set".to_string()))?;

    let (text, source) = match source {
        CvSource::Pdf(pdf) => (extract_pdf_text(pdf).await?, "pdf"),
        CvSource::Text(text) => (text, "text"),
    };

    let resume = import_cv_text(&text, llm).await?;
    Ok(Json(ImportResponse { resume, source }))
}

async fn read_source(mut multipart: Multipart, limit: usize) -> Result<CvSource, AppError> {
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.status(), e.body_text(), limit))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e.status(), e.body_text(), limit))?;
                if !bytes.is_empty() {
                    return Ok(CvSource::Pdf(bytes));
                }
            }
            Some("text") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e.status(), e.body_text(), limit))?;
                if !value.trim().is_empty() {
                    text = Some(value);
                }
            }
            _ => {}
        }
    }

    text.map(CvSource::Text).ok_or_else(|| {
        AppError::Validation("A PDF 'file' or a 'text' field is required".to_string())
    })
}

fn multipart_error(status: StatusCode, detail: String, limit: usize) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::Validation(format!("Invalid multipart body: {detail}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::render::service::{PdfRenderer, RenderSettings};
    use crate::render::testing::FakeLauncher;
    use crate::routes::build_router;
    use crate::state::AppState;

    use super::*;

    const BOUNDARY: &str = "cvboundary";

    fn app() -> axum::Router {
        build_router(AppState {
            config: Config::from_lookup(|_| None).unwrap(),
            renderer: PdfRenderer::new(Arc::new(FakeLauncher::new()), RenderSettings::default()),
            llm: None,
        })
    }

    fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::post("/api/v1/import-cv")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_is_400() {
        let response = app()
            .oneshot(multipart_request(&[("note", "hello")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_without_llm_is_503() {
        let response = app()
            .oneshot(multipart_request(&[("text", "Jane Doe, Rust engineer")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "LLM_UNAVAILABLE");
    }
}
