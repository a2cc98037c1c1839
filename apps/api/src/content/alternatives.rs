//! Comparison pages: this builder against other resume tools.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub slug: &'static str,
    pub competitor: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
    pub free_pdf_export: bool,
    pub ats_friendly_templates: bool,
}

static ALTERNATIVES: &[Alternative] = &[
    Alternative {
        slug: "canva-resume-alternative",
        competitor: "Canva",
        category: "design-tools",
        summary: "Canva layouts look good on screen but often export as images or \
            multi-column text that applicant tracking systems misread.",
        free_pdf_export: true,
        ats_friendly_templates: false,
    },
    Alternative {
        slug: "word-resume-alternative",
        competitor: "Microsoft Word",
        category: "word-processors",
        summary: "Word gives full control but leaves spacing, fonts and page breaks to you.",
        free_pdf_export: true,
        ats_friendly_templates: true,
    },
    Alternative {
        slug: "google-docs-resume-alternative",
        competitor: "Google Docs",
        category: "word-processors",
        summary: "Free and collaborative, with a small set of dated templates.",
        free_pdf_export: true,
        ats_friendly_templates: true,
    },
    Alternative {
        slug: "zety-alternative",
        competitor: "Zety",
        category: "resume-builders",
        summary: "A guided builder whose PDF download sits behind a subscription.",
        free_pdf_export: false,
        ats_friendly_templates: true,
    },
];

pub fn all() -> &'static [Alternative] {
    ALTERNATIVES
}

pub fn get_by_slug(slug: &str) -> Option<&'static Alternative> {
    ALTERNATIVES.iter().find(|a| a.slug == slug)
}

pub fn all_slugs() -> Vec<&'static str> {
    ALTERNATIVES.iter().map(|a| a.slug).collect()
}

pub fn by_category(category: &str) -> Vec<&'static Alternative> {
    ALTERNATIVES
        .iter()
        .filter(|a| a.category == category)
        .collect()
}
