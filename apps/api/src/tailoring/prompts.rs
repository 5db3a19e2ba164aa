// Prompt constants for the tailoring rewrite.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const TAILOR_SYSTEM: &str = "You are an expert resume editor. \
    You tailor an existing resume to a job description by rewording and reordering \
    what is already there. You never add facts.";

/// Rewrite prompt template. Replace `{resume_json}`, `{job_description}`,
/// `{analysis_json}` and `{truth_lock}` before sending.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Tailor the resume below to the job description.

ORIGINAL RESUME (JSON):
{resume_json}

JOB DESCRIPTION:
{job_description}

MATCH ANALYSIS (computed from the original; use it to decide emphasis):
{analysis_json}

Return the tailored resume as a JSON object with EXACTLY this schema:
{
  "personalInfo": {"name": "", "email": "", "phone": "", "location": "", "linkedIn": ""},
  "summary": "",
  "workExperience": [
    {"company": "", "title": "", "startDate": "", "endDate": "", "bullets": [""]}
  ],
  "education": [
    {"institution": "", "degree": "", "field": "", "graduationDate": ""}
  ],
  "skills": [""],
  "certifications": [""]
}

Rules:
- Rewrite the summary toward the job description using only facts from the resume.
- Reword bullets to surface matched skills. Keep numbers and outcomes exactly.
- Order bullets within each role by relevance to the job description.
- Append the marker [LESS_RELEVANT] to bullets that matter least for this role.
  They are dropped first when space runs out.
- Order skills by relevance. You may drop skills; you may not add any.
- You may drop roles; you may not add, merge or split them.

{truth_lock}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_every_placeholder() {
        for placeholder in [
            "{resume_json}",
            "{job_description}",
            "{analysis_json}",
            "{truth_lock}",
        ] {
            assert!(
                TAILOR_PROMPT_TEMPLATE.contains(placeholder),
                "missing {placeholder}"
            );
        }
    }
}
