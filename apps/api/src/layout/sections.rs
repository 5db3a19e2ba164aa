//! Section walk shared by every emitter.
//!
//! Owns the rendering policy that must not differ between PDF and DOCX:
//! section order, which sections are skipped, header text, bullet truncation
//! and `[LESS_RELEVANT]` marker stripping. Emitters implement `SectionSink`
//! and only decide how each call is drawn.

use serde::Serialize;
use tracing::debug;

use crate::models::resume::{display_bullet, is_less_relevant};
use crate::models::ResumeData;
use crate::theme::ThemeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Header => "",
            SectionKind::Summary => "Summary",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Certifications => "Certifications",
        }
    }
}

/// Heading of a work or education entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryHeading {
    /// Bold left-aligned line (job title, or degree).
    pub title: String,
    /// Right-aligned on the title baseline; may be empty.
    pub dates: String,
    /// Line under the title (company, or institution); may be empty.
    pub subtitle: String,
    /// Whether bullets follow, so the heading can be kept with the first one.
    pub has_bullets: bool,
}

/// Receiver of the section walk.
pub trait SectionSink {
    fn name_block(&mut self, name: &str, contact: &[&str]);
    fn begin_section(&mut self, kind: SectionKind, title: &str);
    fn paragraph(&mut self, text: &str);
    fn entry_heading(&mut self, heading: &EntryHeading);
    fn bullet(&mut self, text: &str);
    /// Called between consecutive work entries, never after the last.
    fn entry_separator(&mut self);
}

/// Drives `sink` through the resume in the fixed section order and returns
/// the sections actually emitted.
pub fn walk_sections<S: SectionSink>(
    resume: &ResumeData,
    theme: &ThemeConfig,
    sink: &mut S,
) -> Vec<SectionKind> {
    let mut emitted = vec![SectionKind::Header];
    let info = &resume.personal_info;
    sink.name_block(info.name.trim(), &info.contact_parts());

    let header = |kind: SectionKind| section_title(kind, theme);

    if let Some(summary) = resume.summary.as_deref().map(str::trim) {
        if !summary.is_empty() {
            sink.begin_section(SectionKind::Summary, &header(SectionKind::Summary));
            sink.paragraph(summary);
            emitted.push(SectionKind::Summary);
        }
    }

    if !resume.work_experience.is_empty() {
        sink.begin_section(SectionKind::Experience, &header(SectionKind::Experience));
        let last = resume.work_experience.len() - 1;
        for (i, job) in resume.work_experience.iter().enumerate() {
            let bullets = visible_bullets(&job.bullets, theme.layout.max_bullets_per_role);
            sink.entry_heading(&EntryHeading {
                title: job.title.trim().to_string(),
                dates: job.date_range(),
                subtitle: job.company.trim().to_string(),
                has_bullets: !bullets.is_empty(),
            });
            for bullet in &bullets {
                sink.bullet(bullet);
            }
            if i < last {
                sink.entry_separator();
            }
        }
        emitted.push(SectionKind::Experience);
    }

    if !resume.education.is_empty() {
        sink.begin_section(SectionKind::Education, &header(SectionKind::Education));
        for edu in &resume.education {
            let credential = edu.credential();
            let (title, subtitle) = if credential.is_empty() {
                (edu.institution.trim().to_string(), String::new())
            } else {
                (credential, edu.institution.trim().to_string())
            };
            sink.entry_heading(&EntryHeading {
                title,
                dates: edu.graduation_date.trim().to_string(),
                subtitle,
                has_bullets: false,
            });
        }
        emitted.push(SectionKind::Education);
    }

    let skills: Vec<&str> = resume
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !skills.is_empty() {
        sink.begin_section(SectionKind::Skills, &header(SectionKind::Skills));
        sink.paragraph(&skills.join(", "));
        emitted.push(SectionKind::Skills);
    }

    let certifications: Vec<&str> = resume
        .certifications
        .iter()
        .flatten()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if !certifications.is_empty() {
        sink.begin_section(
            SectionKind::Certifications,
            &header(SectionKind::Certifications),
        );
        for cert in certifications {
            sink.bullet(cert);
        }
        emitted.push(SectionKind::Certifications);
    }

    emitted
}

/// Header text as the theme wants it displayed.
pub fn section_title(kind: SectionKind, theme: &ThemeConfig) -> String {
    if theme.sections.header.uppercase {
        kind.title().to_uppercase()
    } else {
        kind.title().to_string()
    }
}

/// Display text of the bullets that make the cut for one role.
///
/// At most `max` bullets survive. When some must go, `[LESS_RELEVANT]`
/// bullets are dropped first (latest first), then the tail. Order is kept.
pub fn visible_bullets(bullets: &[String], max: usize) -> Vec<String> {
    let candidates: Vec<&String> = bullets.iter().filter(|b| !b.trim().is_empty()).collect();
    let mut keep = vec![true; candidates.len()];
    let mut excess = candidates.len().saturating_sub(max);

    if excess > 0 {
        debug!(
            total = candidates.len(),
            max, "truncating bullets to the per-role maximum"
        );
    }

    for (i, bullet) in candidates.iter().enumerate().rev() {
        if excess == 0 {
            break;
        }
        if is_less_relevant(bullet) {
            keep[i] = false;
            excess -= 1;
        }
    }
    for i in (0..candidates.len()).rev() {
        if excess == 0 {
            break;
        }
        if keep[i] {
            keep[i] = false;
            excess -= 1;
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter(|(_, k)| *k)
        .map(|(b, _)| display_bullet(b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, PersonalInfo, WorkExperience};
    use crate::theme::{resolve, Preset};

    /// Records calls as strings.
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl SectionSink for Recorder {
        fn name_block(&mut self, name: &str, contact: &[&str]) {
            self.0.push(format!("name:{name}|{}", contact.join(",")));
        }
        fn begin_section(&mut self, _kind: SectionKind, title: &str) {
            self.0.push(format!("section:{title}"));
        }
        fn paragraph(&mut self, text: &str) {
            self.0.push(format!("p:{text}"));
        }
        fn entry_heading(&mut self, h: &EntryHeading) {
            self.0.push(format!("entry:{}|{}|{}", h.title, h.dates, h.subtitle));
        }
        fn bullet(&mut self, text: &str) {
            self.0.push(format!("b:{text}"));
        }
        fn entry_separator(&mut self) {
            self.0.push("sep".to_string());
        }
    }

    fn resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                name: "Grace Hopper".to_string(),
                email: "grace@navy.mil".to_string(),
                ..Default::default()
            },
            summary: Some("Compiler pioneer.".to_string()),
            work_experience: vec![
                WorkExperience {
                    company: "US Navy".to_string(),
                    title: "Rear Admiral".to_string(),
                    start_date: "1967".to_string(),
                    end_date: Some("1986".to_string()),
                    bullets: vec!["Standardized COBOL [LESS_RELEVANT]".to_string()],
                },
                WorkExperience {
                    company: "Remington Rand".to_string(),
                    title: "Engineer".to_string(),
                    start_date: "1949".to_string(),
                    end_date: None,
                    bullets: vec![],
                },
            ],
            education: vec![Education {
                institution: "Yale".to_string(),
                degree: "Ph.D.".to_string(),
                field: "Mathematics".to_string(),
                graduation_date: "1934".to_string(),
            }],
            skills: vec!["COBOL".to_string(), " ".to_string(), "FLOW-MATIC".to_string()],
            certifications: None,
        }
    }

    #[test]
    fn test_walk_order_and_content() {
        let mut rec = Recorder::default();
        let theme = resolve(Preset::Professional);
        let emitted = walk_sections(&resume(), &theme, &mut rec);
        assert_eq!(
            emitted,
            vec![
                SectionKind::Header,
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
            ]
        );
        assert_eq!(
            rec.0,
            vec![
                "name:Grace Hopper|grace@navy.mil",
                "section:SUMMARY",
                "p:Compiler pioneer.",
                "section:EXPERIENCE",
                "entry:Rear Admiral|1967 \u{2013} 1986|US Navy",
                "b:Standardized COBOL",
                "sep",
                "entry:Engineer|1949 \u{2013} Present|Remington Rand",
                "section:EDUCATION",
                "entry:Ph.D. in Mathematics|1934|Yale",
                "section:SKILLS",
                "p:COBOL, FLOW-MATIC",
            ]
        );
    }

    #[test]
    fn test_lowercase_headers_when_theme_disables_uppercase() {
        let mut theme = resolve(Preset::Professional);
        theme.sections.header.uppercase = false;
        assert_eq!(section_title(SectionKind::Skills, &theme), "Skills");
    }

    #[test]
    fn test_visible_bullets_truncates_tail() {
        let bullets: Vec<String> = (1..=7).map(|i| format!("bullet {i}")).collect();
        let kept = visible_bullets(&bullets, 5);
        assert_eq!(kept, vec!["bullet 1", "bullet 2", "bullet 3", "bullet 4", "bullet 5"]);
    }

    #[test]
    fn test_visible_bullets_drops_less_relevant_first() {
        let bullets = vec![
            "a".to_string(),
            "b [LESS_RELEVANT]".to_string(),
            "c".to_string(),
            "d".to_string(),
        ];
        assert_eq!(visible_bullets(&bullets, 3), vec!["a", "c", "d"]);
        // Under the limit, marked bullets stay (marker stripped for display).
        assert_eq!(visible_bullets(&bullets, 4), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_certifications_render_as_bullets() {
        let mut r = resume();
        r.certifications = Some(vec!["AWS Certified Solutions Architect (2022)".to_string()]);
        let mut rec = Recorder::default();
        let emitted = walk_sections(&r, &resolve(Preset::Classic), &mut rec);
        assert_eq!(emitted.last(), Some(&SectionKind::Certifications));
        assert_eq!(
            rec.0.last().map(String::as_str),
            Some("b:AWS Certified Solutions Architect (2022)")
        );
    }
}
