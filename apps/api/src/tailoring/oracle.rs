//! The tailoring oracle: an external capability that rewrites a resume toward
//! a job description and returns unvalidated text.
//!
//! `AppState` holds an `Arc<dyn TailoringOracle>`; tests swap in a fake.

use async_trait::async_trait;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, TRUTH_LOCK_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::ResumeData;
use crate::tailoring::analysis::MatchAnalysis;
use crate::tailoring::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};

/// Raw oracle output. Nothing in here is trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleOutput {
    pub text: String,
    /// The oracle stopped because it hit its output limit.
    pub length_stop: bool,
}

#[async_trait]
pub trait TailoringOracle: Send + Sync {
    async fn rewrite(
        &self,
        original: &ResumeData,
        job_description: &str,
        analysis: &MatchAnalysis,
    ) -> Result<OracleOutput, LlmError>;
}

/// Default oracle backed by the Anthropic Messages API.
pub struct LlmTailoringOracle(pub LlmClient);

pub fn build_prompt(
    original: &ResumeData,
    job_description: &str,
    analysis: &MatchAnalysis,
) -> Result<String, serde_json::Error> {
    Ok(TAILOR_PROMPT_TEMPLATE
        .replace("{resume_json}", &serde_json::to_string_pretty(original)?)
        .replace("{analysis_json}", &serde_json::to_string_pretty(analysis)?)
        .replace("{truth_lock}", TRUTH_LOCK_INSTRUCTION)
        .replace("{job_description}", job_description.trim()))
}

#[async_trait]
impl TailoringOracle for LlmTailoringOracle {
    async fn rewrite(
        &self,
        original: &ResumeData,
        job_description: &str,
        analysis: &MatchAnalysis,
    ) -> Result<OracleOutput, LlmError> {
        let prompt = build_prompt(original, job_description, analysis)?;
        let system = format!("{TAILOR_SYSTEM} {JSON_ONLY_SYSTEM}");

        let response = self.0.call(&prompt, &system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?.to_string();
        Ok(OracleOutput {
            text,
            length_stop: response.hit_length_limit(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tailoring::analysis::analyze;

    #[test]
    fn test_build_prompt_fills_every_placeholder() {
        let resume = ResumeData {
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let jd = "Rust engineer wanted";
        let prompt = build_prompt(&resume, jd, &analyze(&resume, jd)).unwrap();
        assert!(!prompt.contains("{resume_json}"));
        assert!(!prompt.contains("{analysis_json}"));
        assert!(!prompt.contains("{truth_lock}"));
        assert!(prompt.contains("Rust engineer wanted"));
        assert!(prompt.contains("\"strongMatches\""));
        assert!(prompt.contains("never invent"));
    }
}
