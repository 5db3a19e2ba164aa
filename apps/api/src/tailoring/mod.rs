//! Tailoring: match analysis, oracle rewrite, response parsing, fabrication
//! guard and QA, in that order.
//!
//! The oracle's output is never trusted. Whatever it returns is parsed, then
//! reconciled against the original; a truth-lock violation fails the request.

pub mod analysis;
pub mod handlers;
pub mod oracle;
pub mod prompts;
pub mod response;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::guard::{reconcile, ValidationIssue};
use crate::models::ResumeData;
use crate::qa::{score, QaReport};
use crate::tailoring::analysis::{analyze, MatchAnalysis};
use crate::tailoring::oracle::TailoringOracle;
use crate::tailoring::response::parse_resume_response;
use crate::theme::ThemeConfig;

/// Repairs applied by the guard to an accepted rewrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub rejected_skills: Vec<String>,
    pub repairs: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorOutcome {
    pub request_id: Uuid,
    /// Truth-locked tailored resume.
    pub resume: ResumeData,
    pub validation: ValidationSummary,
    pub qa: QaReport,
    pub analysis: MatchAnalysis,
}

pub async fn tailor(
    oracle: &dyn TailoringOracle,
    original: &ResumeData,
    job_description: &str,
    theme: &ThemeConfig,
) -> Result<TailorOutcome, AppError> {
    let request_id = Uuid::new_v4();

    let analysis = analyze(original, job_description);
    info!(%request_id, score = analysis.score, "match analysis complete");

    let output = oracle.rewrite(original, job_description, &analysis).await?;
    let tailored = parse_resume_response(&output.text, output.length_stop)?;

    let report = reconcile(&tailored, original)?;
    let qa = score(&report.repaired_resume, theme);
    info!(
        %request_id,
        rejected_skills = report.rejected_skills.len(),
        repairs = report.errors.len(),
        qa = qa.overall,
        "tailored resume accepted"
    );

    Ok(TailorOutcome {
        request_id,
        resume: report.repaired_resume,
        validation: ValidationSummary {
            rejected_skills: report.rejected_skills,
            repairs: report.errors,
        },
        qa,
        analysis,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::{Education, PersonalInfo, WorkExperience};
    use crate::tailoring::oracle::OracleOutput;
    use crate::theme::{resolve, Preset};

    /// Oracle that returns a fixed response.
    pub(crate) struct FakeOracle {
        pub text: String,
        pub length_stop: bool,
    }

    impl FakeOracle {
        pub(crate) fn returning(resume: &ResumeData) -> Self {
            Self {
                text: serde_json::to_string(resume).unwrap(),
                length_stop: false,
            }
        }
    }

    #[async_trait]
    impl TailoringOracle for FakeOracle {
        async fn rewrite(
            &self,
            _original: &ResumeData,
            _job_description: &str,
            _analysis: &MatchAnalysis,
        ) -> Result<OracleOutput, LlmError> {
            Ok(OracleOutput {
                text: self.text.clone(),
                length_stop: self.length_stop,
            })
        }
    }

    pub(crate) fn original() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
            summary: Some("Compiler pioneer.".to_string()),
            work_experience: vec![WorkExperience {
                company: "Remington Rand".to_string(),
                title: "Senior Mathematician".to_string(),
                start_date: "Jan 1949".to_string(),
                end_date: Some("Dec 1966".to_string()),
                bullets: vec![
                    "Built the A-0 compiler".to_string(),
                    "Led the FLOW-MATIC team".to_string(),
                ],
            }],
            education: vec![Education {
                institution: "Yale University".to_string(),
                degree: "PhD".to_string(),
                field: "Mathematics".to_string(),
                graduation_date: "1934".to_string(),
            }],
            skills: vec!["Compilers".to_string(), "COBOL".to_string()],
            certifications: None,
        }
    }

    const JD: &str = "Compiler engineer with COBOL and Fortran experience.";

    #[tokio::test]
    async fn test_pipeline_accepts_reworded_resume_and_drops_invented_skill() {
        let mut rewritten = original();
        rewritten.summary = Some("Compiler pioneer with deep COBOL expertise.".to_string());
        rewritten.work_experience[0].bullets.reverse();
        rewritten.skills = vec!["COBOL".to_string(), "Fortran".to_string()];

        let oracle = FakeOracle::returning(&rewritten);
        let theme = resolve(Preset::Professional);
        let out = tailor(&oracle, &original(), JD, &theme).await.unwrap();

        assert_eq!(out.resume.skills, vec!["COBOL"]);
        assert_eq!(out.validation.rejected_skills, vec!["Fortran"]);
        assert_eq!(out.resume.work_experience[0].bullets[0], "Led the FLOW-MATIC team");
        assert_eq!(out.analysis.strong_matches.len(), 2);
        assert!(out.qa.overall > 0);
    }

    #[tokio::test]
    async fn test_pipeline_rejects_fabricated_role() {
        let mut rewritten = original();
        rewritten.work_experience.push(WorkExperience {
            company: "Harvard".to_string(),
            title: "Programmer".to_string(),
            start_date: "1944".to_string(),
            ..Default::default()
        });
        let oracle = FakeOracle::returning(&rewritten);
        let err = tailor(&oracle, &original(), JD, &resolve(Preset::Professional))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FABRICATED_ENTRY");
    }

    #[tokio::test]
    async fn test_pipeline_reports_truncation() {
        let oracle = FakeOracle {
            text: "{\"personalInfo\": {\"name\": \"Grace".to_string(),
            length_stop: false,
        };
        let err = tailor(&oracle, &original(), JD, &resolve(Preset::Professional))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TRUNCATED_RESPONSE");
    }
}
