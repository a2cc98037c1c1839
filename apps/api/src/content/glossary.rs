//! Glossary of resume and hiring terms.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlossaryTerm {
    pub slug: &'static str,
    pub term: &'static str,
    pub category: &'static str,
    pub definition: &'static str,
}

static TERMS: &[GlossaryTerm] = &[
    GlossaryTerm {
        slug: "ats",
        term: "Applicant Tracking System (ATS)",
        category: "hiring-process",
        definition: "Software employers use to collect, parse and rank applications. \
            Simple layouts and standard section headings parse most reliably.",
    },
    GlossaryTerm {
        slug: "cover-letter",
        term: "Cover letter",
        category: "documents",
        definition: "A one-page letter sent with a resume that explains why the candidate \
            fits the specific role.",
    },
    GlossaryTerm {
        slug: "curriculum-vitae",
        term: "Curriculum vitae (CV)",
        category: "documents",
        definition: "A full record of education, experience and publications. In most of \
            Europe the word is used for any resume.",
    },
    GlossaryTerm {
        slug: "keyword-optimization",
        term: "Keyword optimization",
        category: "hiring-process",
        definition: "Mirroring the wording of a job description so that both screening \
            software and recruiters recognise the match.",
    },
    GlossaryTerm {
        slug: "reverse-chronological",
        term: "Reverse-chronological format",
        category: "formatting",
        definition: "Resume layout that lists the most recent position first. The default \
            expected by recruiters.",
    },
    GlossaryTerm {
        slug: "white-space",
        term: "White space",
        category: "formatting",
        definition: "Empty space between sections and margins that keeps a one-page resume \
            readable when printed.",
    },
];

pub fn all() -> &'static [GlossaryTerm] {
    TERMS
}

pub fn get_by_slug(slug: &str) -> Option<&'static GlossaryTerm> {
    TERMS.iter().find(|t| t.slug == slug)
}

pub fn all_slugs() -> Vec<&'static str> {
    TERMS.iter().map(|t| t.slug).collect()
}

pub fn by_category(category: &str) -> Vec<&'static GlossaryTerm> {
    TERMS.iter().filter(|t| t.category == category).collect()
}
