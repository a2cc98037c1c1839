//! Render request parsing — turns the inbound JSON into a `RenderJob` the
//! renderer can run without further checks.

use serde::Deserialize;

use crate::render::browser::PageMargins;
use crate::render::error::RenderError;

pub const DEFAULT_FILE_STEM: &str = "cv";
const MAX_FILE_STEM_CHARS: usize = 100;

/// Characters that are hostile to filesystems or to a quoted header value.
const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Inbound body of `POST /api/generate-pdf`.
///
/// Either `html` (a full document) or `content` (+ optional `styles`) is used.
#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub styles: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub margin: Option<MarginRequest>,
}

/// Per-side margin overrides. Missing sides keep their default.
#[derive(Debug, Default, Deserialize)]
pub struct MarginRequest {
    pub top: Option<CssLength>,
    pub right: Option<CssLength>,
    pub bottom: Option<CssLength>,
    pub left: Option<CssLength>,
}

/// A CSS length as sent by the editor: usually a string with a unit, but bare
/// numbers (pixels) are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CssLength {
    Text(String),
    Pixels(f64),
}

impl CssLength {
    fn into_css(self) -> String {
        match self {
            CssLength::Text(s) => s,
            CssLength::Pixels(px) => format!("{px}px"),
        }
    }
}

/// A validated render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub document: String,
    pub file_stem: String,
    pub margins: PageMargins,
}

impl RenderRequest {
    pub fn into_job(self) -> Result<RenderJob, RenderError> {
        let document = match (self.html, self.content) {
            (Some(html), _) if !html.trim().is_empty() => html,
            (_, Some(content)) if !content.trim().is_empty() => {
                assemble_document(&content, self.styles.as_deref().unwrap_or_default())
            }
            _ => return Err(RenderError::InvalidRequest),
        };

        Ok(RenderJob {
            document,
            file_stem: sanitize_filename(self.filename.as_deref()),
            margins: resolve_margins(self.margin),
        })
    }
}

/// Wraps editor output in a minimal HTML shell. Content and styles are
/// embedded verbatim.
pub fn assemble_document(content: &str, styles: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{styles}</style>\n</head>\n<body>{content}</body>\n</html>"
    )
}

fn resolve_margins(margin: Option<MarginRequest>) -> PageMargins {
    let mut margins = PageMargins::default();
    let Some(req) = margin else {
        return margins;
    };

    let sides = [
        (req.top, &mut margins.top),
        (req.right, &mut margins.right),
        (req.bottom, &mut margins.bottom),
        (req.left, &mut margins.left),
    ];
    for (value, slot) in sides {
        if let Some(css) = value.map(CssLength::into_css) {
            if !css.trim().is_empty() {
                *slot = css;
            }
        }
    }
    margins
}

/// Reduces an untrusted filename hint to a stem that is safe inside
/// `Content-Disposition: attachment; filename="<stem>.pdf"`.
pub fn sanitize_filename(hint: Option<&str>) -> String {
    let Some(hint) = hint else {
        return DEFAULT_FILE_STEM.to_string();
    };

    let mut cleaned: String = hint
        .chars()
        .filter(|c| !c.is_control() && !FORBIDDEN_FILENAME_CHARS.contains(c))
        .collect();
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "");
    }

    let mut stem = cleaned.trim();
    if stem.len() >= 4 && stem.is_char_boundary(stem.len() - 4) {
        let (head, ext) = stem.split_at(stem.len() - 4);
        if ext.eq_ignore_ascii_case(".pdf") {
            stem = head;
        }
    }
    let stem = stem.trim().trim_matches('.').trim();

    let stem: String = stem.chars().take(MAX_FILE_STEM_CHARS).collect();
    let stem = stem.trim();
    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}
