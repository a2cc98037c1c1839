use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const MSG_CONTENT_REQUIRED: &str = "HTML content is required";
pub const MSG_PAYLOAD_TOO_LARGE: &str = "Payload too large";
pub const MSG_RENDER_FAILED: &str = "Failed to generate PDF";

/// Everything that can go wrong between receiving a render request and
/// handing back PDF bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no renderable HTML content in request")]
    InvalidRequest,

    #[error("payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("browser infrastructure failure: {0}")]
    Infrastructure(String),

    #[error("rendering failed: {0}")]
    Rendering(String),

    #[error("render exceeded {0:?}")]
    Timeout(Duration),
}

impl RenderError {
    pub fn status(&self) -> StatusCode {
        match self {
            RenderError::InvalidRequest => StatusCode::BAD_REQUEST,
            RenderError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RenderError::Infrastructure(_)
            | RenderError::Rendering(_)
            | RenderError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plain-text bodies with fixed messages. Internal detail only goes to the log.
impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        let message = match &self {
            RenderError::InvalidRequest => MSG_CONTENT_REQUIRED,
            RenderError::PayloadTooLarge { limit } => {
                tracing::warn!("Rejected render payload over {limit} bytes");
                MSG_PAYLOAD_TOO_LARGE
            }
            RenderError::Infrastructure(detail) => {
                tracing::error!("PDF render infrastructure error: {detail}");
                MSG_RENDER_FAILED
            }
            RenderError::Rendering(detail) => {
                tracing::error!("PDF render error: {detail}");
                MSG_RENDER_FAILED
            }
            RenderError::Timeout(limit) => {
                tracing::error!("PDF render timed out after {limit:?}");
                MSG_RENDER_FAILED
            }
        };

        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(RenderError::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RenderError::PayloadTooLarge { limit: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_internal_errors_share_500() {
        for err in [
            RenderError::Infrastructure("spawn failed".into()),
            RenderError::Rendering("page crashed".into()),
            RenderError::Timeout(Duration::from_secs(60)),
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
