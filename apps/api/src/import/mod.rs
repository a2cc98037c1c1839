//! CV import: PDF (or pasted text) → text → LLM extraction → normalized resume.
//! All LLM calls go through llm_client.

pub mod handlers;
pub mod normalize;
pub mod prompts;

use anyhow::anyhow;
use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::import::normalize::normalize_resume;
use crate::import::prompts::{build_import_prompt, import_system_prompt};
use crate::llm_client::{Completion, LlmClient};
use crate::models::resume::ImportedResume;

/// Longest CV text forwarded to the model, in characters.
const MAX_CV_TEXT_CHARS: usize = 40_000;

/// Extracts the text layer of a PDF. Runs on the blocking pool; a malformed
/// document can make the parser panic, which is reported as an error here.
pub async fn extract_pdf_text(pdf: Bytes) -> Result<String, AppError> {
    if !pdf.starts_with(b"%PDF") {
        return Err(AppError::Validation(
            "Uploaded file is not a PDF".to_string(),
        ));
    }

    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&pdf).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("PDF extraction task failed: {e}")))?
    .map_err(|e| {
        debug!("pdf-extract rejected upload: {e}");
        AppError::UnprocessableEntity("The PDF could not be read".to_string())
    })?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the PDF".to_string(),
        ));
    }
    Ok(text)
}

/// Sends CV text to the model and returns the normalized record.
pub async fn import_cv_text(cv_text: &str, llm: &LlmClient) -> Result<ImportedResume, AppError> {
    let cv_text = truncate_chars(cv_text.trim(), MAX_CV_TEXT_CHARS);
    if cv_text.is_empty() {
        return Err(AppError::Validation("CV text cannot be empty".to_string()));
    }

    let prompt = build_import_prompt(cv_text);
    let system = import_system_prompt();
    let parsed: ImportedResume = llm
        .extract_json(Completion::new(&system, &prompt))
        .await
        .map_err(|e| AppError::Llm(format!("CV extraction failed: {e}")))?;

    let resume = normalize_resume(parsed);
    info!(
        "Imported CV: {} experience, {} education, {} skills",
        resume.experience.len(),
        resume.education.len(),
        resume.skills.len()
    );
    Ok(resume)
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[tokio::test]
    async fn test_non_pdf_upload_rejected() {
        let err = extract_pdf_text(Bytes::from_static(b"PK\x03\x04 zip file"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_unprocessable() {
        let err = extract_pdf_text(Bytes::from_static(b"%PDF-1.4\nnot really a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::UnprocessableEntity(_) | AppError::Internal(_)
        ));
    }
}
