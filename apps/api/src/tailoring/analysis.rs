//! Match analysis: deterministic keyword comparison of the original resume
//! against a job description. Handed to the oracle as context and returned
//! to the caller alongside the tailored resume.
//!
//! Per-skill strength:
//! - the normalized skill appears in the job description -> 1.0
//! - the dash/space-stripped skill appears in the stripped description -> 0.8
//! - some significant word of the skill appears -> 0.5
//! - otherwise -> 0.0
//!
//! `score = mean(strength) * 100`. Strong >= 0.8, partial 0.4-0.79, gap < 0.4.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::guard::normalize_skill;
use crate::models::resume::display_bullet;
use crate::models::ResumeData;

/// Description terms worth reporting when the resume already mentions them.
const MAX_MENTIONED_TERMS: usize = 15;
const MIN_TERM_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "you", "our", "are", "will", "who", "have", "has", "this",
    "that", "from", "your", "their", "they", "about", "into", "work", "team", "role", "years",
    "year", "experience", "ability", "strong", "plus", "including", "across", "using", "etc",
    "not", "all", "can", "what", "how", "why", "per", "but", "also", "more", "other",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    pub skill: String,
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    /// 0-100
    pub score: u32,
    pub strong_matches: Vec<SkillMatch>,
    pub partial_matches: Vec<SkillMatch>,
    /// Original skills the description never mentions.
    pub unmatched_skills: Vec<String>,
    /// Description terms that already appear somewhere in the resume text.
    pub mentioned_terms: Vec<String>,
    pub recommendation: String,
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

fn significant_words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
        .filter(|w| w.len() >= MIN_TERM_LEN && !STOPWORDS.contains(w))
}

fn skill_strength(skill: &str, jd: &str, jd_stripped: &str, jd_words: &BTreeSet<&str>) -> f32 {
    let norm = normalize_skill(skill);
    if norm.is_empty() {
        return 0.0;
    }
    if jd.contains(&norm) {
        1.0
    } else if jd_stripped.contains(&strip_separators(&norm)) {
        0.8
    } else if significant_words(&norm).any(|w| jd_words.contains(w)) {
        0.5
    } else {
        0.0
    }
}

/// Everything the resume says, lowercased, for term lookups.
fn resume_text(resume: &ResumeData) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.extend(resume.summary.clone());
    for job in &resume.work_experience {
        parts.push(job.title.clone());
        parts.extend(job.bullets.iter().map(|b| display_bullet(b)));
    }
    for edu in &resume.education {
        parts.push(edu.credential());
    }
    parts.extend(resume.skills.iter().cloned());
    parts.extend(resume.certifications.iter().flatten().cloned());
    parts.join(" ").to_lowercase()
}

pub fn analyze(resume: &ResumeData, job_description: &str) -> MatchAnalysis {
    let jd = normalize_skill(job_description);
    let jd_stripped = strip_separators(&jd);
    let jd_words: BTreeSet<&str> = significant_words(&jd).collect();

    let mut strong_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut unmatched_skills = Vec::new();
    let mut total = 0.0_f32;
    let mut counted = 0_u32;

    for skill in resume.skills.iter().filter(|s| !s.trim().is_empty()) {
        let strength = skill_strength(skill, &jd, &jd_stripped, &jd_words);
        total += strength;
        counted += 1;
        let m = SkillMatch {
            skill: skill.trim().to_string(),
            strength,
        };
        if strength >= 0.8 {
            strong_matches.push(m);
        } else if strength >= 0.4 {
            partial_matches.push(m);
        } else {
            unmatched_skills.push(m.skill);
        }
    }

    let score = if counted > 0 {
        ((total / counted as f32) * 100.0).round() as u32
    } else {
        0
    };

    let text = resume_text(resume);
    let text_words: BTreeSet<&str> = significant_words(&text).collect();
    let mentioned_terms: Vec<String> = jd_words
        .iter()
        .filter(|w| text_words.contains(*w))
        .take(MAX_MENTIONED_TERMS)
        .map(|w| w.to_string())
        .collect();

    let recommendation = build_recommendation(score, &unmatched_skills, counted);

    MatchAnalysis {
        score,
        strong_matches,
        partial_matches,
        unmatched_skills,
        mentioned_terms,
        recommendation,
    }
}

fn build_recommendation(score: u32, unmatched: &[String], counted: u32) -> String {
    if counted == 0 {
        return "No skills on the resume; nothing to match against the job description."
            .to_string();
    }
    if score >= 80 {
        "Strong fit. Lead with the matched skills.".to_string()
    } else if score >= 50 {
        "Moderate fit. Emphasize the matched skills and the experience behind them.".to_string()
    } else {
        let top: Vec<&str> = unmatched.iter().take(3).map(String::as_str).collect();
        format!(
            "Low fit ({score}/100). Skills the description does not ask for: {}.",
            top.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkExperience;

    const JD: &str = "Senior Backend Engineer. You will build REST APIs in Rust and Go, \
        run services on Kubernetes, and tune PostgreSQL. Machine learning a plus.";

    fn resume(skills: &[&str]) -> ResumeData {
        ResumeData {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            work_experience: vec![WorkExperience {
                company: "Acme".to_string(),
                title: "Backend Engineer".to_string(),
                start_date: "2019".to_string(),
                bullets: vec!["Tuned PostgreSQL queries [LESS_RELEVANT]".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_classifies_skills() {
        let a = analyze(&resume(&["Rust", "Machine-Learning", "PostgreSQL Tuning", "COBOL"]), JD);
        let strong: Vec<&str> = a.strong_matches.iter().map(|m| m.skill.as_str()).collect();
        assert_eq!(strong, vec!["Rust", "Machine-Learning"]);
        assert_eq!(a.partial_matches.len(), 1);
        assert_eq!(a.partial_matches[0].skill, "PostgreSQL Tuning");
        assert_eq!(a.unmatched_skills, vec!["COBOL"]);
        // (1.0 + 0.8 + 0.5 + 0.0) / 4
        assert!((57..=58).contains(&a.score));
    }

    #[test]
    fn test_mentioned_terms_come_from_resume_text() {
        let a = analyze(&resume(&["Rust"]), JD);
        assert!(a.mentioned_terms.contains(&"postgresql".to_string()));
        assert!(a.mentioned_terms.contains(&"backend".to_string()));
        assert!(!a.mentioned_terms.contains(&"kubernetes".to_string()));
        assert!(!a.mentioned_terms.iter().any(|t| t.contains("less_relevant")));
    }

    #[test]
    fn test_no_skills() {
        let a = analyze(&resume(&[]), JD);
        assert_eq!(a.score, 0);
        assert!(a.recommendation.contains("No skills"));
    }

    #[test]
    fn test_deterministic() {
        let r = resume(&["Rust", "Go", "Kubernetes"]);
        assert_eq!(analyze(&r, JD), analyze(&r, JD));
    }
}
