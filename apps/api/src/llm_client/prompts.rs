// Shared prompt fragments. Each service that needs LLM calls keeps its own
// prompts.rs alongside it and builds on these.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to extraction prompts so the model never fills gaps.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    CRITICAL: Only extract what is literally present in the input. \
    Do NOT infer, embellish, or invent details. \
    Use null for any single value that is missing and [] for any missing list.";
