//! Cleans up model output before it reaches the editor: trims text, drops
//! blanks and empty entries, dedups skills and languages, assigns missing IDs.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::resume::{
    CertificationEntry, EducationEntry, ExperienceEntry, ImportedResume, LanguageEntry,
    PersonalInfo, ProjectEntry, SkillEntry,
};

pub fn normalize_resume(resume: ImportedResume) -> ImportedResume {
    ImportedResume {
        personal: normalize_personal(resume.personal),
        experience: resume
            .experience
            .into_iter()
            .map(|e| ExperienceEntry {
                id: ensure_id(e.id),
                company: clean(e.company),
                position: clean(e.position),
                location: clean(e.location),
                start_date: clean(e.start_date),
                end_date: clean(e.end_date),
                current: e.current,
                description: clean(e.description),
                highlights: clean_list(e.highlights),
            })
            .filter(|e| e.company.is_some() || e.position.is_some())
            .collect(),
        education: resume
            .education
            .into_iter()
            .map(|e| EducationEntry {
                id: ensure_id(e.id),
                institution: clean(e.institution),
                degree: clean(e.degree),
                field: clean(e.field),
                start_date: clean(e.start_date),
                end_date: clean(e.end_date),
                grade: clean(e.grade),
            })
            .filter(|e| e.institution.is_some() || e.degree.is_some())
            .collect(),
        skills: dedup_by_name(
            resume.skills,
            |s| &s.name,
            |s| SkillEntry {
                id: ensure_id(s.id),
                name: s.name.trim().to_string(),
                level: clean(s.level),
            },
        ),
        languages: dedup_by_name(
            resume.languages,
            |l| &l.name,
            |l| LanguageEntry {
                id: ensure_id(l.id),
                name: l.name.trim().to_string(),
                proficiency: clean(l.proficiency),
            },
        ),
        projects: resume
            .projects
            .into_iter()
            .map(|p| ProjectEntry {
                id: ensure_id(p.id),
                name: clean(p.name),
                description: clean(p.description),
                url: clean(p.url),
                technologies: clean_list(p.technologies),
            })
            .filter(|p| p.name.is_some())
            .collect(),
        certifications: resume
            .certifications
            .into_iter()
            .map(|c| CertificationEntry {
                id: ensure_id(c.id),
                name: clean(c.name),
                issuer: clean(c.issuer),
                date: clean(c.date),
            })
            .filter(|c| c.name.is_some())
            .collect(),
    }
}

fn normalize_personal(p: PersonalInfo) -> PersonalInfo {
    PersonalInfo {
        full_name: clean(p.full_name),
        title: clean(p.title),
        email: clean(p.email),
        phone: clean(p.phone),
        location: clean(p.location),
        website: clean(p.website),
        linkedin: clean(p.linkedin),
        summary: clean(p.summary),
    }
}

fn ensure_id(id: String) -> String {
    let id = id.trim();
    if id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id.to_string()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| clean(Some(v)))
        .collect()
}

/// Keeps the first entry per case-insensitive name, in input order.
fn dedup_by_name<T>(
    items: Vec<T>,
    name: impl Fn(&T) -> &String,
    finish: impl Fn(T) -> T,
) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let key = name(item).trim().to_lowercase();
            !key.is_empty() && seen.insert(key)
        })
        .map(finish)
        .collect()
}
