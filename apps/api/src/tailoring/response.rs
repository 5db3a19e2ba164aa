//! Parsing of the oracle's raw text into `ResumeData`.
//!
//! Truncation is told apart from plain malformation so the caller can give an
//! actionable message: a cut-off response needs a shorter resume or a retry,
//! a malformed one is an oracle bug.

use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::ResumeData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("the tailored resume was cut off before it finished; try again or shorten the resume")]
    Truncated,

    #[error("the tailored resume was not valid resume JSON: {0}")]
    Malformed(String),
}

impl ResponseError {
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseError::Truncated => "TRUNCATED_RESPONSE",
            ResponseError::Malformed(_) => "MALFORMED_JSON",
        }
    }
}

/// Outcome of scanning for the first top-level JSON object.
#[derive(Debug, PartialEq)]
enum Scan {
    NoObject,
    /// Byte range of the balanced object.
    Complete(usize, usize),
    Unbalanced,
}

/// Finds the first `{ ... }` with balanced braces, ignoring braces inside
/// string literals.
fn scan_object(text: &str) -> Scan {
    let Some(start) = text.find('{') else {
        return Scan::NoObject;
    };
    let mut depth = 0_u32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + i + c.len_utf8();
                    return Scan::Complete(start, end);
                }
            }
            _ => {}
        }
    }
    Scan::Unbalanced
}

/// Parses oracle output. `length_stop` is the oracle's own report that it hit
/// its output limit.
pub fn parse_resume_response(text: &str, length_stop: bool) -> Result<ResumeData, ResponseError> {
    if length_stop {
        return Err(ResponseError::Truncated);
    }
    let body = strip_json_fences(text);
    match scan_object(body) {
        Scan::NoObject => Err(ResponseError::Malformed(
            "no JSON object in the response".to_string(),
        )),
        Scan::Unbalanced => Err(ResponseError::Truncated),
        Scan::Complete(start, end) => serde_json::from_str(&body[start..end]).map_err(|e| {
            if e.is_eof() {
                ResponseError::Truncated
            } else {
                ResponseError::Malformed(e.to_string())
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "personalInfo": {"name": "Ada Lovelace", "email": "ada@example.com"},
        "workExperience": [],
        "education": [],
        "skills": ["Analysis {engines}"]
    }"#;

    #[test]
    fn test_parses_plain_and_fenced_json() {
        let plain = parse_resume_response(VALID, false).unwrap();
        assert_eq!(plain.personal_info.name, "Ada Lovelace");
        assert_eq!(plain.skills, vec!["Analysis {engines}"]);

        let fenced = format!("```json\n{VALID}\n```");
        assert_eq!(parse_resume_response(&fenced, false).unwrap(), plain);
    }

    #[test]
    fn test_tolerates_prose_around_object() {
        let wrapped = format!("Here is the resume:\n{VALID}\nGood luck!");
        assert!(parse_resume_response(&wrapped, false).is_ok());
    }

    #[test]
    fn test_unbalanced_braces_are_truncation() {
        let cut = &VALID[..VALID.len() - 20];
        assert_eq!(
            parse_resume_response(cut, false),
            Err(ResponseError::Truncated)
        );
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"{"personalInfo": {"name": "}{", "email": "a\"}b"}, "skills": []}"#;
        let r = parse_resume_response(text, false).unwrap();
        assert_eq!(r.personal_info.name, "}{");
        assert_eq!(r.personal_info.email, "a\"}b");
    }

    #[test]
    fn test_length_stop_is_truncation_even_if_parseable() {
        assert_eq!(
            parse_resume_response(VALID, true),
            Err(ResponseError::Truncated)
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_resume_response("I cannot help with that.", false).unwrap_err();
        assert_eq!(err.kind(), "MALFORMED_JSON");

        let err = parse_resume_response(r#"{"skills": "Rust"}"#, false).unwrap_err();
        assert!(matches!(err, ResponseError::Malformed(_)));
        assert_ne!(
            ResponseError::Truncated.to_string(),
            err.to_string(),
            "messages must be distinct"
        );
    }
}
