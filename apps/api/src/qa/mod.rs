//! Visual QA scorer: an advisory 0-100 score over the resume data.
//!
//! Never blocks export. Each issue carries a penalty; the score is 100 minus
//! the penalties, floored at zero.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::layout::sections::visible_bullets;
use crate::layout::wrap::line_count;
use crate::models::resume::is_open_ended_date;
use crate::models::ResumeData;
use crate::render::winansi;
use crate::theme::ThemeConfig;

/// Bullets longer than this tend to wrap awkwardly.
pub const MAX_BULLET_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaIssue {
    pub code: &'static str,
    pub severity: Severity,
    pub field: String,
    pub message: String,
    pub penalty: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaReport {
    pub overall: u8,
    pub estimated_pages: usize,
    pub issues: Vec<QaIssue>,
}

#[derive(Default)]
struct Collector {
    issues: Vec<QaIssue>,
}

impl Collector {
    fn push(
        &mut self,
        code: &'static str,
        severity: Severity,
        penalty: u32,
        field: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.issues.push(QaIssue {
            code,
            severity,
            field: field.into(),
            message: message.into(),
            penalty,
        });
    }
}

/// Scores `resume` against the page geometry of `theme`.
pub fn score(resume: &ResumeData, theme: &ThemeConfig) -> QaReport {
    let mut c = Collector::default();

    check_required(resume, &mut c);
    check_entries(resume, &mut c);
    check_bullets(resume, &mut c);
    check_characters(resume, &mut c);
    check_dates(resume, &mut c);

    let estimated_pages = estimate_pages(resume, theme);
    if estimated_pages > theme.layout.max_pages {
        c.push(
            "TOO_LONG",
            Severity::Warning,
            10,
            "document",
            format!(
                "estimated {estimated_pages} pages, more than the {} this theme allows",
                theme.layout.max_pages
            ),
        );
    }

    let penalty: u32 = c.issues.iter().map(|i| i.penalty).sum();
    let overall = 100u32.saturating_sub(penalty) as u8;
    debug!(overall, issues = c.issues.len(), estimated_pages, "qa scored");

    QaReport {
        overall,
        estimated_pages,
        issues: c.issues,
    }
}

fn check_required(resume: &ResumeData, c: &mut Collector) {
    let info = &resume.personal_info;
    if info.name.trim().is_empty() {
        c.push("MISSING_NAME", Severity::Error, 25, "personalInfo.name", "name is missing");
    }
    let has_contact = !info.email.trim().is_empty()
        || info.phone.as_deref().is_some_and(|p| !p.trim().is_empty());
    if !has_contact {
        c.push(
            "MISSING_CONTACT",
            Severity::Error,
            20,
            "personalInfo",
            "no email or phone number",
        );
    }
    if resume.skills.iter().all(|s| s.trim().is_empty()) {
        c.push("NO_SKILLS", Severity::Error, 15, "skills", "list at least one skill");
    }
}

fn check_entries(resume: &ResumeData, c: &mut Collector) {
    for (i, job) in resume.work_experience.iter().enumerate() {
        let missing: Vec<&str> = [
            ("company", job.company.as_str()),
            ("title", job.title.as_str()),
            ("startDate", job.start_date.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();
        if !missing.is_empty() {
            c.push(
                "INCOMPLETE_ROLE",
                Severity::Warning,
                8,
                format!("workExperience[{i}]"),
                format!("missing {}", missing.join(", ")),
            );
        }
        if job.bullets.iter().all(|b| b.trim().is_empty()) {
            c.push(
                "NO_BULLETS",
                Severity::Warning,
                4,
                format!("workExperience[{i}].bullets"),
                "role has no bullet points",
            );
        }
    }

    for (i, edu) in resume.education.iter().enumerate() {
        let missing: Vec<&str> = [
            ("institution", edu.institution.as_str()),
            ("degree", edu.degree.as_str()),
            ("field", edu.field.as_str()),
            ("graduationDate", edu.graduation_date.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();
        if !missing.is_empty() {
            c.push(
                "INCOMPLETE_EDUCATION",
                Severity::Warning,
                5,
                format!("education[{i}]"),
                format!("missing {}", missing.join(", ")),
            );
        }
    }
}

fn check_bullets(resume: &ResumeData, c: &mut Collector) {
    for (i, job) in resume.work_experience.iter().enumerate() {
        for (j, bullet) in job.bullets.iter().enumerate() {
            let len = bullet.trim().chars().count();
            if len > MAX_BULLET_CHARS {
                c.push(
                    "LONG_BULLET",
                    Severity::Warning,
                    3,
                    format!("workExperience[{i}].bullets[{j}]"),
                    format!("{len} characters; keep bullets under {MAX_BULLET_CHARS}"),
                );
            }
        }
    }
}

/// Every displayed string with its field path.
fn text_fields(resume: &ResumeData) -> Vec<(String, &str)> {
    let info = &resume.personal_info;
    let mut fields: Vec<(String, &str)> = vec![
        ("personalInfo.name".to_string(), info.name.as_str()),
        ("personalInfo.email".to_string(), info.email.as_str()),
    ];
    for (key, value) in [
        ("phone", &info.phone),
        ("location", &info.location),
        ("linkedIn", &info.linked_in),
    ] {
        if let Some(v) = value {
            fields.push((format!("personalInfo.{key}"), v.as_str()));
        }
    }
    if let Some(summary) = &resume.summary {
        fields.push(("summary".to_string(), summary.as_str()));
    }
    for (i, job) in resume.work_experience.iter().enumerate() {
        fields.push((format!("workExperience[{i}].company"), job.company.as_str()));
        fields.push((format!("workExperience[{i}].title"), job.title.as_str()));
        for (j, b) in job.bullets.iter().enumerate() {
            fields.push((format!("workExperience[{i}].bullets[{j}]"), b.as_str()));
        }
    }
    for (i, edu) in resume.education.iter().enumerate() {
        fields.push((format!("education[{i}].institution"), edu.institution.as_str()));
        fields.push((format!("education[{i}].degree"), edu.degree.as_str()));
        fields.push((format!("education[{i}].field"), edu.field.as_str()));
    }
    for (i, s) in resume.skills.iter().enumerate() {
        fields.push((format!("skills[{i}]"), s.as_str()));
    }
    for (i, cert) in resume.certifications.iter().flatten().enumerate() {
        fields.push((format!("certifications[{i}]"), cert.as_str()));
    }
    fields
}

fn check_characters(resume: &ResumeData, c: &mut Collector) {
    for (field, text) in text_fields(resume) {
        if text.chars().any(|ch| ch.is_control()) {
            c.push(
                "CONTROL_CHARACTER",
                Severity::Warning,
                5,
                field,
                "contains control characters",
            );
            continue;
        }
        let unsupported: String = text
            .chars()
            .filter(|ch| !winansi::is_encodable(*ch))
            .take(5)
            .collect();
        if !unsupported.is_empty() {
            c.push(
                "UNSUPPORTED_CHARACTER",
                Severity::Warning,
                5,
                field,
                format!("characters the PDF fonts cannot draw: {unsupported}"),
            );
        } else if !text.is_ascii() {
            c.push(
                "NON_ASCII",
                Severity::Info,
                0,
                field,
                "contains non-ASCII characters; check they render as intended",
            );
        }
    }
}

/// Parses the date forms resumes commonly use: "Jan 2020", "January 2020",
/// "01/2020", "2020-01", "2020-01-15" and "2020".
pub fn parse_resume_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    let with_day = format!("1 {s}");
    ["%d %b %Y", "%d %B %Y", "%d %m/%Y", "%d %Y-%m", "%d %b. %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_day, fmt).ok())
}

fn check_dates(resume: &ResumeData, c: &mut Collector) {
    for (i, job) in resume.work_experience.iter().enumerate() {
        let start = job.start_date.trim();
        let start_date = parse_resume_date(start);
        if !start.is_empty() && start_date.is_none() {
            c.push(
                "UNPARSEABLE_DATE",
                Severity::Info,
                1,
                format!("workExperience[{i}].startDate"),
                format!("'{start}' is not a recognized date"),
            );
        }
        if job.is_open_ended() {
            continue;
        }
        let end = job.end_date.as_deref().unwrap_or_default().trim();
        match parse_resume_date(end) {
            None => c.push(
                "UNPARSEABLE_DATE",
                Severity::Info,
                1,
                format!("workExperience[{i}].endDate"),
                format!("'{end}' is not a recognized date"),
            ),
            Some(end_date) if start_date.is_some_and(|s| end_date < s) => c.push(
                "DATE_ORDER",
                Severity::Warning,
                5,
                format!("workExperience[{i}]"),
                "end date is before start date",
            ),
            Some(_) => {}
        }
    }
    for (i, edu) in resume.education.iter().enumerate() {
        let date = edu.graduation_date.trim();
        if !date.is_empty()
            && !is_open_ended_date(Some(date))
            && parse_resume_date(date).is_none()
        {
            c.push(
                "UNPARSEABLE_DATE",
                Severity::Info,
                1,
                format!("education[{i}].graduationDate"),
                format!("'{date}' is not a recognized date"),
            );
        }
    }
}

/// Page count implied by summing estimated line heights against the theme's
/// usable page height.
pub fn estimate_pages(resume: &ResumeData, theme: &ThemeConfig) -> usize {
    let sizes = &theme.typography.sizes;
    let sp = &theme.spacing;
    let width = theme.content_width();
    let body = theme.typography.family.regular();
    let body_line = theme.line_advance(sizes.body);
    let lines = |text: &str, indent: f32| {
        line_count(text, |s| body.text_width(s, sizes.body), width - indent) as f32
    };

    let mut height = theme.line_advance(sizes.name) + sp.name_gap + theme.line_advance(sizes.contact);
    let mut section = |content: f32| height += sp.section_gap + theme.section_header_height() + content;

    if let Some(summary) = resume.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        section(lines(summary, 0.0) * body_line);
    }
    if !resume.work_experience.is_empty() {
        let mut h = 0.0;
        for job in &resume.work_experience {
            h += sp.entry_gap + theme.line_advance(sizes.job_title) + body_line;
            for bullet in visible_bullets(&job.bullets, theme.layout.max_bullets_per_role) {
                h += sp.bullet_gap + lines(&bullet, theme.elements.bullet.indent) * body_line;
            }
        }
        section(h);
    }
    if !resume.education.is_empty() {
        let per_entry = sp.entry_gap + theme.line_advance(sizes.job_title) + body_line;
        section(resume.education.len() as f32 * per_entry);
    }
    if resume.skills.iter().any(|s| !s.trim().is_empty()) {
        section(lines(&resume.skills.join(", "), 0.0) * body_line);
    }
    let certs = resume.certifications.as_deref().unwrap_or_default();
    if !certs.is_empty() {
        let h: f32 = certs
            .iter()
            .map(|cert| lines(cert, theme.elements.bullet.indent) * body_line)
            .sum();
        section(h);
    }

    let usable = theme.usable_height().max(1.0);
    ((height / usable).ceil() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, PersonalInfo, WorkExperience};
    use crate::theme::{resolve, Preset};

    fn clean() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                name: "Barbara Liskov".to_string(),
                email: "liskov@example.com".to_string(),
                ..Default::default()
            },
            summary: Some("Designer of CLU and the substitution principle.".to_string()),
            work_experience: vec![WorkExperience {
                company: "MIT".to_string(),
                title: "Institute Professor".to_string(),
                start_date: "Sep 1972".to_string(),
                end_date: Some("Present".to_string()),
                bullets: vec!["Led the Programming Methodology Group".to_string()],
            }],
            education: vec![Education {
                institution: "Stanford University".to_string(),
                degree: "PhD".to_string(),
                field: "Computer Science".to_string(),
                graduation_date: "1968".to_string(),
            }],
            skills: vec!["Distributed Systems".to_string()],
            certifications: None,
        }
    }

    fn codes(report: &QaReport) -> Vec<&'static str> {
        report.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_clean_resume_scores_100() {
        let report = score(&clean(), &resolve(Preset::Professional));
        assert_eq!(report.overall, 100, "{:?}", report.issues);
        assert_eq!(report.estimated_pages, 1);
    }

    #[test]
    fn test_required_fields() {
        let mut r = clean();
        r.personal_info.name.clear();
        r.personal_info.email.clear();
        r.skills.clear();
        let report = score(&r, &resolve(Preset::Professional));
        assert_eq!(
            codes(&report),
            vec!["MISSING_NAME", "MISSING_CONTACT", "NO_SKILLS"]
        );
        assert_eq!(report.overall, 40);
    }

    #[test]
    fn test_long_bullet_and_incomplete_entries() {
        let mut r = clean();
        r.work_experience[0].bullets.push("x".repeat(201));
        r.work_experience[0].company.clear();
        r.education[0].degree.clear();
        let c = codes(&score(&r, &resolve(Preset::Professional)));
        assert!(c.contains(&"LONG_BULLET"));
        assert!(c.contains(&"INCOMPLETE_ROLE"));
        assert!(c.contains(&"INCOMPLETE_EDUCATION"));
    }

    #[test]
    fn test_character_checks() {
        let mut r = clean();
        r.summary = Some("Café owner \u{1F600}".to_string());
        r.skills = vec!["Résumé parsing".to_string(), "Tabs\there".to_string()];
        let report = score(&r, &resolve(Preset::Professional));
        let c = codes(&report);
        assert!(c.contains(&"UNSUPPORTED_CHARACTER"));
        assert!(c.contains(&"NON_ASCII"));
        assert!(c.contains(&"CONTROL_CHARACTER"));
    }

    #[test]
    fn test_date_checks() {
        assert!(parse_resume_date("Jan 2020").is_some());
        assert!(parse_resume_date("January 2020").is_some());
        assert!(parse_resume_date("01/2020").is_some());
        assert!(parse_resume_date("2020-01").is_some());
        assert!(parse_resume_date("2020").is_some());
        assert!(parse_resume_date("sometime").is_none());

        let mut r = clean();
        r.work_experience[0].start_date = "2020".to_string();
        r.work_experience[0].end_date = Some("2018".to_string());
        let c = codes(&score(&r, &resolve(Preset::Professional)));
        assert_eq!(c, vec!["DATE_ORDER"]);
    }

    #[test]
    fn test_page_estimate_flags_long_documents() {
        let mut r = clean();
        let bullet = "Designed and verified a distributed object store ".repeat(4);
        r.work_experience = (0..12)
            .map(|i| WorkExperience {
                company: format!("Lab {i}"),
                title: "Researcher".to_string(),
                start_date: "2001".to_string(),
                end_date: Some("2002".to_string()),
                bullets: vec![bullet.clone(); 5],
            })
            .collect();
        let theme = resolve(Preset::Professional);
        let report = score(&r, &theme);
        assert!(report.estimated_pages > theme.layout.max_pages);
        assert!(codes(&report).contains(&"TOO_LONG"));
        assert!(report.overall < 100);
    }

    #[test]
    fn test_score_is_floored_at_zero() {
        let mut r = clean();
        r.personal_info.name.clear();
        r.personal_info.email.clear();
        r.skills.clear();
        r.work_experience = vec![WorkExperience::default(); 10];
        assert_eq!(score(&r, &resolve(Preset::Professional)).overall, 0);
    }
}
