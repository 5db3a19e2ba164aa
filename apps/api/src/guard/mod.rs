//! Fabrication guard: reconciles a tailored resume against the original.
//!
//! A tailored resume may reword and reorder, never invent. Format drift
//! (dropped fields, surface variants of a skill, a reworded title that strays
//! too far) is repaired from the original. Anything that would put a claim in
//! the output with no basis in the original is a hard `ValidationError`.

pub mod skills;

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::is_open_ended_date;
use crate::models::{Education, ResumeData, WorkExperience};

pub use skills::{filter_skills, normalize_skill, skill_matches};

const PLACEHOLDER_DEGREE: &str = "Degree";
const PLACEHOLDER_FIELD: &str = "General Studies";
const PLACEHOLDER_GRADUATION: &str = "N/A";

/// Minimum share of title words two overlapping titles must have in common.
const TITLE_SIMILARITY: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} does not match the original resume")]
    IdentityMismatch { field: &'static str },

    #[error("{section}: {reason}")]
    FabricatedEntry {
        section: &'static str,
        reason: String,
    },

    #[error("certification '{0}' is not on the original resume")]
    FabricatedCertification(String),

    #[error("{field} of '{company}' changed from '{original}' to '{tailored}'")]
    DateTampering {
        company: String,
        field: &'static str,
        original: String,
        tailored: String,
    },

    #[error("no original role matches company '{company}' (start {start_date})")]
    UnknownExperience { company: String, start_date: String },

    #[error("no original education entry matches institution '{0}'")]
    UnknownEducation(String),
}

impl ValidationError {
    /// Machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::IdentityMismatch { .. } => "IDENTITY_MISMATCH",
            ValidationError::FabricatedEntry { .. } => "FABRICATED_ENTRY",
            ValidationError::FabricatedCertification(_) => "FABRICATED_CERTIFICATION",
            ValidationError::DateTampering { .. } => "DATE_TAMPERING",
            ValidationError::UnknownExperience { .. } => "UNKNOWN_EXPERIENCE",
            ValidationError::UnknownEducation(_) => "UNKNOWN_EDUCATION",
        }
    }

    /// Resume field the error is about.
    pub fn field(&self) -> String {
        match self {
            ValidationError::IdentityMismatch { field } => format!("personalInfo.{field}"),
            ValidationError::FabricatedEntry { section, .. } => section.to_string(),
            ValidationError::FabricatedCertification(_) => "certifications".to_string(),
            ValidationError::DateTampering { field, .. } => format!("workExperience.{field}"),
            ValidationError::UnknownExperience { .. } => "workExperience".to_string(),
            ValidationError::UnknownEducation(_) => "education".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub field: String,
    pub reason: String,
    pub kind: &'static str,
}

impl ValidationIssue {
    fn missing(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            kind: "MISSING_FIELD",
        }
    }
}

impl From<&ValidationError> for ValidationIssue {
    fn from(e: &ValidationError) -> Self {
        Self {
            field: e.field(),
            reason: e.to_string(),
            kind: e.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub repaired_resume: ResumeData,
    pub rejected_skills: Vec<String>,
    pub errors: Vec<ValidationIssue>,
}

/// Returns a repaired, truth-locked copy of `tailored`, or the first violation
/// that cannot be repaired.
pub fn validate(tailored: &ResumeData, original: &ResumeData) -> Result<ResumeData, ValidationError> {
    reconcile(tailored, original).map(|report| report.repaired_resume)
}

/// Like [`validate`], keeping the repair notes and rejected skills.
pub fn reconcile(
    tailored: &ResumeData,
    original: &ResumeData,
) -> Result<ValidationReport, ValidationError> {
    let mut reconciler = Reconciler::default();
    let repaired = reconciler.run(tailored, original)?;
    Ok(ValidationReport {
        is_valid: true,
        repaired_resume: repaired.resume,
        rejected_skills: repaired.rejected_skills,
        errors: reconciler.issues,
    })
}

/// Same reconciliation as [`validate`], reported instead of failed.
///
/// Recoverable repairs are listed as issues. On a fatal violation the report
/// is invalid and `repaired_resume` is the original, which is always safe.
pub fn validate_with_report(tailored: &ResumeData, original: &ResumeData) -> ValidationReport {
    let mut reconciler = Reconciler::default();
    match reconciler.run(tailored, original) {
        Ok(repaired) => ValidationReport {
            is_valid: true,
            repaired_resume: repaired.resume,
            rejected_skills: repaired.rejected_skills,
            errors: reconciler.issues,
        },
        Err(e) => {
            warn!(kind = e.kind(), "tailored resume rejected: {e}");
            let mut errors = reconciler.issues;
            errors.push(ValidationIssue::from(&e));
            ValidationReport {
                is_valid: false,
                repaired_resume: original.clone(),
                rejected_skills: Vec::new(),
                errors,
            }
        }
    }
}

struct Repaired {
    resume: ResumeData,
    rejected_skills: Vec<String>,
}

#[derive(Default)]
struct Reconciler {
    issues: Vec<ValidationIssue>,
}

impl Reconciler {
    fn run(&mut self, tailored: &ResumeData, original: &ResumeData) -> Result<Repaired, ValidationError> {
        check_identity(tailored, original)?;

        let mut resume = tailored.clone();
        self.fill_personal_info(&mut resume, original);
        self.fill_summary(&mut resume, original);
        resume.work_experience =
            self.reconcile_experience(&tailored.work_experience, &original.work_experience)?;
        resume.education = self.reconcile_education(&tailored.education, &original.education)?;

        let skills = filter_skills(&tailored.skills, &original.skills);
        for skill in &skills.rejected {
            self.issues.push(ValidationIssue {
                field: "skills".to_string(),
                reason: format!("'{skill}' is not on the original resume"),
                kind: "SKILL_REJECTED",
            });
        }
        if skills.restored {
            self.issues.push(ValidationIssue::missing(
                "skills",
                "no tailored skill matched; original list restored",
            ));
        }
        resume.skills = skills.kept;

        resume.certifications =
            self.reconcile_certifications(tailored.certifications.as_deref(), original)?;

        debug!(
            issues = self.issues.len(),
            rejected_skills = skills.rejected.len(),
            "tailored resume reconciled"
        );
        Ok(Repaired {
            resume,
            rejected_skills: skills.rejected,
        })
    }

    fn fill_personal_info(&mut self, resume: &mut ResumeData, original: &ResumeData) {
        let orig = &original.personal_info;
        let info = &mut resume.personal_info;
        let fields = [
            ("phone", &mut info.phone, &orig.phone),
            ("location", &mut info.location, &orig.location),
            ("linkedIn", &mut info.linked_in, &orig.linked_in),
        ];
        for (name, value, original_value) in fields {
            if is_blank(value.as_deref()) && !is_blank(original_value.as_deref()) {
                *value = original_value.clone();
                self.issues.push(ValidationIssue::missing(
                    format!("personalInfo.{name}"),
                    "restored from original",
                ));
            }
        }
    }

    fn fill_summary(&mut self, resume: &mut ResumeData, original: &ResumeData) {
        if is_blank(resume.summary.as_deref()) && !is_blank(original.summary.as_deref()) {
            resume.summary = original.summary.clone();
            self.issues
                .push(ValidationIssue::missing("summary", "restored from original"));
        }
    }

    fn reconcile_experience(
        &mut self,
        tailored: &[WorkExperience],
        original: &[WorkExperience],
    ) -> Result<Vec<WorkExperience>, ValidationError> {
        if tailored.len() > original.len() {
            return Err(ValidationError::FabricatedEntry {
                section: "workExperience",
                reason: format!(
                    "{} roles where the original has {}",
                    tailored.len(),
                    original.len()
                ),
            });
        }

        let slots = assign_experience(tailored, original)?;
        let mut out = Vec::with_capacity(tailored.len());
        for (i, (entry, idx)) in tailored.iter().zip(slots).enumerate() {
            out.push(self.repair_experience(entry, &original[idx], i)?);
        }
        Ok(out)
    }

    fn repair_experience(
        &mut self,
        entry: &WorkExperience,
        orig: &WorkExperience,
        i: usize,
    ) -> Result<WorkExperience, ValidationError> {
        let field = |name: &str| format!("workExperience[{i}].{name}");
        let mut repaired = entry.clone();

        if entry.company.trim().is_empty() {
            self.issues
                .push(ValidationIssue::missing(field("company"), "restored from original"));
        }
        repaired.company = orig.company.clone();

        if entry.title.trim().is_empty() {
            repaired.title = orig.title.clone();
            self.issues
                .push(ValidationIssue::missing(field("title"), "restored from original"));
        } else if !titles_similar(&entry.title, &orig.title) {
            debug!(tailored = %entry.title, original = %orig.title, "title restored");
            repaired.title = orig.title.clone();
            self.issues.push(ValidationIssue {
                field: field("title"),
                reason: format!(
                    "'{}' strays too far from '{}'; original restored",
                    entry.title.trim(),
                    orig.title.trim()
                ),
                kind: "TITLE_RESTORED",
            });
        }

        let start = entry.start_date.trim();
        if start.is_empty() {
            self.issues
                .push(ValidationIssue::missing(field("startDate"), "restored from original"));
        } else if start != orig.start_date.trim() {
            return Err(ValidationError::DateTampering {
                company: orig.company.clone(),
                field: "startDate",
                original: orig.start_date.clone(),
                tailored: entry.start_date.clone(),
            });
        }
        repaired.start_date = orig.start_date.clone();

        match entry.end_date.as_deref().map(str::trim) {
            None | Some("") => {
                if !is_blank(orig.end_date.as_deref()) {
                    self.issues
                        .push(ValidationIssue::missing(field("endDate"), "restored from original"));
                }
                repaired.end_date = orig.end_date.clone();
            }
            // An open-ended original may legitimately have ended since.
            Some(_) if is_open_ended_date(orig.end_date.as_deref()) => {}
            Some(end) => {
                let orig_end = orig.end_date.as_deref().map(str::trim).unwrap_or_default();
                if end != orig_end {
                    return Err(ValidationError::DateTampering {
                        company: orig.company.clone(),
                        field: "endDate",
                        original: orig_end.to_string(),
                        tailored: end.to_string(),
                    });
                }
                repaired.end_date = orig.end_date.clone();
            }
        }

        if entry.bullets.iter().all(|b| b.trim().is_empty()) && !orig.bullets.is_empty() {
            repaired.bullets = orig.bullets.clone();
            self.issues
                .push(ValidationIssue::missing(field("bullets"), "restored from original"));
        }

        Ok(repaired)
    }

    fn reconcile_education(
        &mut self,
        tailored: &[Education],
        original: &[Education],
    ) -> Result<Vec<Education>, ValidationError> {
        if tailored.len() > original.len() {
            return Err(ValidationError::FabricatedEntry {
                section: "education",
                reason: format!(
                    "{} entries where the original has {}",
                    tailored.len(),
                    original.len()
                ),
            });
        }

        let mut used = HashSet::new();
        let mut out = Vec::with_capacity(tailored.len());
        for (i, entry) in tailored.iter().enumerate() {
            let institution = entry.institution.trim();
            let idx = if institution.is_empty() {
                i
            } else {
                original
                    .iter()
                    .position(|o| same_name(&o.institution, institution))
                    .ok_or_else(|| ValidationError::UnknownEducation(institution.to_string()))?
            };
            if !used.insert(idx) {
                return Err(ValidationError::FabricatedEntry {
                    section: "education",
                    reason: format!(
                        "'{}' appears more than once",
                        original[idx].institution.trim()
                    ),
                });
            }
            out.push(self.repair_education(entry, original.get(idx), i));
        }
        Ok(out)
    }

    fn repair_education(&mut self, entry: &Education, orig: Option<&Education>, i: usize) -> Education {
        let mut repaired = entry.clone();
        let slots = [
            ("institution", &mut repaired.institution, orig.map(|o| &o.institution), None),
            ("degree", &mut repaired.degree, orig.map(|o| &o.degree), Some(PLACEHOLDER_DEGREE)),
            ("field", &mut repaired.field, orig.map(|o| &o.field), Some(PLACEHOLDER_FIELD)),
            (
                "graduationDate",
                &mut repaired.graduation_date,
                orig.map(|o| &o.graduation_date),
                Some(PLACEHOLDER_GRADUATION),
            ),
        ];
        for (name, value, from_original, placeholder) in slots {
            if !value.trim().is_empty() {
                continue;
            }
            let field = format!("education[{i}].{name}");
            match (from_original.filter(|v| !v.trim().is_empty()), placeholder) {
                (Some(v), _) => {
                    *value = v.clone();
                    self.issues
                        .push(ValidationIssue::missing(field, "restored from original"));
                }
                (None, Some(p)) => {
                    *value = p.to_string();
                    self.issues
                        .push(ValidationIssue::missing(field, "filled with placeholder"));
                }
                (None, None) => {}
            }
        }
        repaired
    }

    fn reconcile_certifications(
        &mut self,
        tailored: Option<&[String]>,
        original: &ResumeData,
    ) -> Result<Option<Vec<String>>, ValidationError> {
        let originals = original.certifications.as_deref().unwrap_or_default();
        let Some(tailored) = tailored else {
            if !originals.is_empty() {
                self.issues
                    .push(ValidationIssue::missing("certifications", "restored from original"));
            }
            return Ok(original.certifications.clone());
        };

        let mut out = Vec::with_capacity(tailored.len());
        for cert in tailored {
            let cert = cert.trim();
            if cert.is_empty() {
                continue;
            }
            let lower = cert.to_lowercase();
            match originals.iter().find(|o| o.trim().to_lowercase() == lower) {
                Some(o) => out.push(o.clone()),
                None => return Err(ValidationError::FabricatedCertification(cert.to_string())),
            }
        }
        Ok(Some(out))
    }
}

fn check_identity(tailored: &ResumeData, original: &ResumeData) -> Result<(), ValidationError> {
    let (t, o) = (&tailored.personal_info, &original.personal_info);
    if t.name != o.name {
        return Err(ValidationError::IdentityMismatch { field: "name" });
    }
    if t.email != o.email {
        return Err(ValidationError::IdentityMismatch { field: "email" });
    }
    Ok(())
}

/// Original role index for each tailored entry. Exact (company, start date)
/// pairs claim their role first; entries with a dropped date then take the
/// first unclaimed role at the same company, and entries with a dropped
/// company take their own position (or the first unclaimed role).
fn assign_experience(
    tailored: &[WorkExperience],
    original: &[WorkExperience],
) -> Result<Vec<usize>, ValidationError> {
    let mut used = HashSet::new();
    let mut slots: Vec<Option<usize>> = vec![None; tailored.len()];

    for (slot, entry) in slots.iter_mut().zip(tailored) {
        let company = entry.company.trim();
        let start = entry.start_date.trim();
        if company.is_empty() || start.is_empty() {
            continue;
        }
        let exact = |o: &WorkExperience| same_name(&o.company, company) && o.start_date.trim() == start;
        if let Some(idx) = first_unclaimed(original, &used, exact) {
            used.insert(idx);
            *slot = Some(idx);
        } else if original.iter().any(exact) {
            return Err(duplicated_role(company));
        }
    }

    let mut assigned = Vec::with_capacity(tailored.len());
    for (position, (slot, entry)) in slots.into_iter().zip(tailored).enumerate() {
        let idx = match slot {
            Some(idx) => idx,
            None => {
                let idx = fallback_match(entry, original, &used, position)?;
                used.insert(idx);
                idx
            }
        };
        assigned.push(idx);
    }
    Ok(assigned)
}

fn fallback_match(
    entry: &WorkExperience,
    original: &[WorkExperience],
    used: &HashSet<usize>,
    position: usize,
) -> Result<usize, ValidationError> {
    let company = entry.company.trim();
    if company.is_empty() {
        let own = (position < original.len() && !used.contains(&position)).then_some(position);
        return own
            .or_else(|| first_unclaimed(original, used, |_| true))
            .ok_or_else(|| duplicated_role("(blank)"));
    }
    let same_company = |o: &WorkExperience| same_name(&o.company, company);
    match first_unclaimed(original, used, same_company) {
        Some(idx) => Ok(idx),
        None if original.iter().any(same_company) => Err(duplicated_role(company)),
        None => Err(ValidationError::UnknownExperience {
            company: company.to_string(),
            start_date: entry.start_date.trim().to_string(),
        }),
    }
}

fn first_unclaimed<F>(original: &[WorkExperience], used: &HashSet<usize>, pred: F) -> Option<usize>
where
    F: Fn(&WorkExperience) -> bool,
{
    original
        .iter()
        .enumerate()
        .find(|(i, o)| !used.contains(i) && pred(*o))
        .map(|(i, _)| i)
}

fn duplicated_role(company: &str) -> ValidationError {
    ValidationError::FabricatedEntry {
        section: "workExperience",
        reason: format!("role at '{company}' appears more than once"),
    }
}

fn same_name(a: &str, b: &str) -> bool {
    let norm = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    norm(a) == norm(b)
}

fn title_tokens(title: &str) -> HashSet<String> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Titles are "very similar" when one keeps every word of the other
/// ("Cryptanalyst" / "Senior Cryptanalyst") or most words are shared.
pub fn titles_similar(tailored: &str, original: &str) -> bool {
    let (a, b) = (title_tokens(tailored), title_tokens(original));
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    if a.is_subset(&b) || b.is_subset(&a) {
        return true;
    }
    let shared = a.intersection(&b).count() as f32;
    shared / a.len().max(b.len()) as f32 >= TITLE_SIMILARITY
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonalInfo;

    fn job(company: &str, title: &str, start: &str, end: Option<&str>) -> WorkExperience {
        WorkExperience {
            company: company.to_string(),
            title: title.to_string(),
            start_date: start.to_string(),
            end_date: end.map(str::to_string),
            bullets: vec![format!("Shipped things at {company}")],
        }
    }

    fn original() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
                phone: Some("+44 1234".to_string()),
                location: Some("Manchester".to_string()),
                linked_in: None,
            },
            summary: Some("Mathematician and codebreaker.".to_string()),
            work_experience: vec![
                job("University of Manchester", "Deputy Director", "1948", None),
                job("GC&CS", "Cryptanalyst", "1938", Some("1945")),
            ],
            education: vec![Education {
                institution: "King's College, Cambridge".to_string(),
                degree: "BA".to_string(),
                field: "Mathematics".to_string(),
                graduation_date: "1934".to_string(),
            }],
            skills: vec!["Machine Learning".to_string(), "Cryptanalysis".to_string()],
            certifications: Some(vec!["AWS Certified Solutions Architect (2022)".to_string()]),
        }
    }

    #[test]
    fn test_untouched_resume_is_valid() {
        let o = original();
        assert_eq!(validate(&o, &o).unwrap(), o);
        let report = validate_with_report(&o, &o);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_scenario_b_dash_variant_skill_is_kept() {
        let mut t = original();
        t.skills = vec!["Machine-Learning".to_string()];
        let report = validate_with_report(&t, &original());
        assert!(report.is_valid);
        assert_eq!(report.repaired_resume.skills, vec!["Machine-Learning"]);
        assert!(report.rejected_skills.is_empty());
        assert!(report.errors.iter().all(|e| e.field != "skills"));
    }

    #[test]
    fn test_scenario_c_new_certification_is_fabricated() {
        let mut t = original();
        t.certifications = Some(vec!["AWS Certified Developer".to_string()]);
        let err = validate(&t, &original()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FabricatedCertification("AWS Certified Developer".to_string())
        );
        assert_eq!(err.kind(), "FABRICATED_CERTIFICATION");
    }

    #[test]
    fn test_certification_case_insensitive_match() {
        let mut t = original();
        t.certifications = Some(vec!["aws certified solutions architect (2022)".to_string()]);
        let out = validate(&t, &original()).unwrap();
        assert_eq!(out.certifications, original().certifications);
    }

    #[test]
    fn test_scenario_d_extra_role_is_fabricated() {
        let mut t = original();
        t.work_experience.push(job("Bletchley Park", "Lead", "1939", Some("1945")));
        let err = validate(&t, &original()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::FabricatedEntry {
                section: "workExperience",
                ..
            }
        ));
    }

    #[test]
    fn test_identity_mismatch_is_not_repaired() {
        let mut t = original();
        t.personal_info.email = "alan.turing@example.com".to_string();
        let report = validate_with_report(&t, &original());
        assert!(!report.is_valid);
        assert_eq!(report.repaired_resume, original());
        assert_eq!(report.errors.last().unwrap().kind, "IDENTITY_MISMATCH");
        assert_eq!(report.errors.last().unwrap().field, "personalInfo.email");
    }

    #[test]
    fn test_missing_fields_are_backfilled() {
        let mut t = original();
        t.personal_info.phone = None;
        t.summary = None;
        t.certifications = None;
        t.work_experience[1].title = String::new();
        t.work_experience[1].end_date = None;
        t.work_experience[1].bullets.clear();
        let report = validate_with_report(&t, &original());
        assert!(report.is_valid);
        assert_eq!(report.repaired_resume, original());
        let fields: Vec<&str> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"personalInfo.phone"));
        assert!(fields.contains(&"workExperience[1].title"));
        assert!(fields.contains(&"workExperience[1].endDate"));
        assert!(fields.contains(&"workExperience[1].bullets"));
        assert!(report.errors.iter().all(|e| e.kind == "MISSING_FIELD"));
    }

    #[test]
    fn test_start_date_tampering() {
        let mut t = original();
        t.work_experience[1].start_date = "1936".to_string();
        let err = validate(&t, &original()).unwrap_err();
        assert_eq!(err.kind(), "DATE_TAMPERING");
    }

    #[test]
    fn test_end_date_may_change_only_when_open_ended() {
        let mut t = original();
        t.work_experience[0].end_date = Some("1954".to_string());
        assert!(validate(&t, &original()).is_ok());

        let mut t = original();
        t.work_experience[1].end_date = Some("Present".to_string());
        assert!(matches!(
            validate(&t, &original()),
            Err(ValidationError::DateTampering { field: "endDate", .. })
        ));
    }

    #[test]
    fn test_unknown_company_is_rejected() {
        let mut t = original();
        t.work_experience[0].company = "Ferranti".to_string();
        let err = validate(&t, &original()).unwrap_err();
        assert_eq!(err.kind(), "UNKNOWN_EXPERIENCE");
    }

    #[test]
    fn test_reordered_and_dropped_roles_are_fine() {
        let mut t = original();
        t.work_experience.reverse();
        t.work_experience.pop();
        let out = validate(&t, &original()).unwrap();
        assert_eq!(out.work_experience.len(), 1);
        assert_eq!(out.work_experience[0].company, "GC&CS");
    }

    #[test]
    fn test_dropped_start_dates_at_same_company_are_backfilled() {
        let mut orig = original();
        orig.work_experience = vec![
            job("Acme", "Staff Engineer", "2020", Some("2023")),
            job("Acme", "Engineer", "2017", Some("2020")),
        ];

        let mut t = orig.clone();
        t.work_experience[1].start_date.clear();
        let out = validate(&t, &orig).unwrap();
        assert_eq!(out.work_experience, orig.work_experience);

        for entry in &mut t.work_experience {
            entry.start_date.clear();
        }
        let out = validate(&t, &orig).unwrap();
        assert_eq!(out.work_experience[0].start_date, "2020");
        assert_eq!(out.work_experience[1].start_date, "2017");
    }

    #[test]
    fn test_exact_match_wins_over_earlier_dropped_date() {
        let mut orig = original();
        orig.work_experience = vec![
            job("Acme", "Staff Engineer", "2020", Some("2023")),
            job("Acme", "Engineer", "2017", Some("2020")),
        ];
        let mut t = orig.clone();
        t.work_experience.swap(0, 1);
        t.work_experience[0].start_date.clear();
        let out = validate(&t, &orig).unwrap();
        assert_eq!(out.work_experience[0].start_date, "2017");
        assert_eq!(out.work_experience[1].start_date, "2020");
    }

    #[test]
    fn test_duplicated_role_is_fabricated() {
        let mut t = original();
        t.work_experience[1] = t.work_experience[0].clone();
        assert_eq!(validate(&t, &original()).unwrap_err().kind(), "FABRICATED_ENTRY");
    }

    #[test]
    fn test_reworded_title_kept_unrelated_title_restored() {
        let mut t = original();
        t.work_experience[1].title = "Senior Cryptanalyst".to_string();
        t.work_experience[0].title = "Chief Executive Officer".to_string();
        let report = validate_with_report(&t, &original());
        assert!(report.is_valid);
        let jobs = &report.repaired_resume.work_experience;
        assert_eq!(jobs[1].title, "Senior Cryptanalyst");
        assert_eq!(jobs[0].title, "Deputy Director");
        assert!(report.errors.iter().any(|e| e.kind == "TITLE_RESTORED"));
    }

    #[test]
    fn test_education_backfill_and_placeholders() {
        let mut o = original();
        o.education[0].field = String::new();
        let mut t = o.clone();
        t.education[0] = Education {
            institution: String::new(),
            degree: String::new(),
            field: String::new(),
            graduation_date: "1934".to_string(),
        };
        let out = validate(&t, &o).unwrap();
        assert_eq!(out.education[0].institution, "King's College, Cambridge");
        assert_eq!(out.education[0].degree, "BA");
        assert_eq!(out.education[0].field, PLACEHOLDER_FIELD);
    }

    #[test]
    fn test_unknown_or_extra_education_is_rejected() {
        let mut t = original();
        t.education[0].institution = "Princeton".to_string();
        assert_eq!(validate(&t, &original()).unwrap_err().kind(), "UNKNOWN_EDUCATION");

        let mut t = original();
        t.education.push(t.education[0].clone());
        assert_eq!(validate(&t, &original()).unwrap_err().kind(), "FABRICATED_ENTRY");
    }

    #[test]
    fn test_all_skills_rejected_restores_original() {
        let mut t = original();
        t.skills = vec!["Quantum Computing".to_string()];
        let report = validate_with_report(&t, &original());
        assert!(report.is_valid);
        assert_eq!(report.repaired_resume.skills, original().skills);
        assert_eq!(report.rejected_skills, vec!["Quantum Computing"]);
    }

    #[test]
    fn test_truth_lock_invariant_holds_for_accepted_output() {
        let o = original();
        let mut t = o.clone();
        t.work_experience.truncate(1);
        t.skills = vec!["machine learning".to_string(), "Rust".to_string()];
        let out = validate(&t, &o).unwrap();
        assert_eq!(out.personal_info.name, o.personal_info.name);
        assert_eq!(out.personal_info.email, o.personal_info.email);
        assert!(out.work_experience.len() <= o.work_experience.len());
        assert!(out.education.len() <= o.education.len());
        for job in &out.work_experience {
            assert!(o
                .work_experience
                .iter()
                .any(|oj| oj.company == job.company && oj.start_date == job.start_date));
        }
        let orig_skills: Vec<String> = o.skills.iter().map(|s| normalize_skill(s)).collect();
        for skill in &out.skills {
            let n = normalize_skill(skill);
            assert!(orig_skills.iter().any(|os| skill_matches(&n, os)));
        }
    }
}
