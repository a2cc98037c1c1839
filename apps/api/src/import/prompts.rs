// CV import LLM prompt templates.

pub const CV_IMPORT_SYSTEM: &str = "\
You are a precise resume data extractor. \
Convert the text of a CV into structured JSON. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Keep the candidate's own wording for descriptions and highlights. \
Dates stay in the format the CV uses (e.g. '2021-03', 'Mar 2021', '2019').";

pub const CV_IMPORT_PROMPT: &str = r#"Extract the resume below into a JSON object.

CV TEXT:
{cv_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "personal": {
    "full_name": "string" | null, "title": "string" | null, "email": "string" | null,
    "phone": "string" | null, "location": "string" | null, "website": "string" | null,
    "linkedin": "string" | null, "summary": "string" | null
  },
  "experience": [{
    "company": "string", "position": "string", "location": "string" | null,
    "start_date": "string" | null, "end_date": "string" | null, "current": boolean,
    "description": "string" | null, "highlights": ["string"]
  }],
  "education": [{
    "institution": "string", "degree": "string" | null, "field": "string" | null,
    "start_date": "string" | null, "end_date": "string" | null, "grade": "string" | null
  }],
  "skills": [{"name": "string", "level": "string" | null}],
  "languages": [{"name": "string", "proficiency": "string" | null}],
  "projects": [{
    "name": "string", "description": "string" | null, "url": "string" | null,
    "technologies": ["string"]
  }],
  "certifications": [{"name": "string", "issuer": "string" | null, "date": "string" | null}]
}

{instructions}"#;

/// Fills the import prompt for one CV.
pub fn build_import_prompt(cv_text: &str) -> String {
    CV_IMPORT_PROMPT
        .replace(
            "{instructions}",
            crate::llm_client::prompts::NO_INVENTION_INSTRUCTION,
        )
        .replace("{cv_text}", cv_text)
}

/// System prompt: extraction rules plus the shared JSON-only contract.
pub fn import_system_prompt() -> String {
    format!(
        "{CV_IMPORT_SYSTEM} {}",
        crate::llm_client::prompts::JSON_ONLY_SYSTEM
    )
}
