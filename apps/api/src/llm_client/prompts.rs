// Cross-cutting prompt fragments. Service-specific prompts live beside the
// service (see tailoring/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every rewrite prompt. The guard enforces the same rules.
pub const TRUTH_LOCK_INSTRUCTION: &str = "\
    CRITICAL: You may reword and reorder, but never invent. \
    Keep the candidate's name, email, phone, location and LinkedIn exactly as given. \
    Keep every company, start date and end date exactly as given. \
    Do not add employers, schools, degrees or certifications. \
    Only list skills that appear in the original skills list.";
