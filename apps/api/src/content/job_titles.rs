//! Job-title guides: what a resume for each role should emphasise.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobTitleGuide {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
    pub key_skills: &'static [&'static str],
}

static GUIDES: &[JobTitleGuide] = &[
    JobTitleGuide {
        slug: "software-engineer",
        title: "Software Engineer",
        category: "engineering",
        summary: "Lead with shipped systems and measurable impact; list languages close \
            to the projects that used them.",
        key_skills: &["System design", "Testing", "Code review", "Cloud infrastructure"],
    },
    JobTitleGuide {
        slug: "data-analyst",
        title: "Data Analyst",
        category: "data",
        summary: "Show the decisions your analysis changed, not just the dashboards you built.",
        key_skills: &["SQL", "Data visualisation", "Statistics", "Stakeholder communication"],
    },
    JobTitleGuide {
        slug: "product-manager",
        title: "Product Manager",
        category: "product",
        summary: "Frame each role around outcomes: adoption, revenue and retention you moved.",
        key_skills: &["Roadmapping", "User research", "Prioritisation", "Experimentation"],
    },
    JobTitleGuide {
        slug: "registered-nurse",
        title: "Registered Nurse",
        category: "healthcare",
        summary: "Put licences and certifications near the top; quantify patient load and unit type.",
        key_skills: &["Patient assessment", "Care planning", "EHR documentation", "BLS/ACLS"],
    },
    JobTitleGuide {
        slug: "devops-engineer",
        title: "DevOps Engineer",
        category: "engineering",
        summary: "Highlight reliability numbers, deployment frequency and cost savings.",
        key_skills: &["CI/CD", "Kubernetes", "Infrastructure as code", "Observability"],
    },
];

pub fn all() -> &'static [JobTitleGuide] {
    GUIDES
}

pub fn get_by_slug(slug: &str) -> Option<&'static JobTitleGuide> {
    GUIDES.iter().find(|g| g.slug == slug)
}

pub fn all_slugs() -> Vec<&'static str> {
    GUIDES.iter().map(|g| g.slug).collect()
}

pub fn by_category(category: &str) -> Vec<&'static JobTitleGuide> {
    GUIDES.iter().filter(|g| g.category == category).collect()
}
