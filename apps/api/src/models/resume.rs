use serde::{Deserialize, Serialize};

/// In-place tag on a bullet meaning "keep, but de-emphasize".
/// Stored in the data model; stripped only when a bullet is displayed.
pub const LESS_RELEVANT_MARKER: &str = "[LESS_RELEVANT]";

/// Structured resume. Wire format is camelCase, matching what the tailoring
/// oracle emits.
///
/// Every field except `personalInfo` defaults when absent so that a partially
/// dropped oracle rewrite still parses; the guard back-fills what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
}

/// Contact block. `name` and `email` are identity anchors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, rename = "linkedIn", skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
}

/// A single role. `(company, start_date)` identifies the entry across
/// pipeline stages; an empty string means the field was dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_date: String,
    /// `None` (or a "Present"-style value) means the role is open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub graduation_date: String,
}

impl PersonalInfo {
    /// Contact parts in display order, skipping blanks.
    pub fn contact_parts(&self) -> Vec<&str> {
        [
            Some(self.email.as_str()),
            self.phone.as_deref(),
            self.location.as_deref(),
            self.linked_in.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
    }
}

impl WorkExperience {
    /// True when the role has no fixed end (missing, "Present", "Current", ...).
    pub fn is_open_ended(&self) -> bool {
        is_open_ended_date(self.end_date.as_deref())
    }

    /// "Jan 2020 – Present" style range used by every renderer.
    pub fn date_range(&self) -> String {
        let end = match self.end_date.as_deref().map(str::trim) {
            Some(end) if !end.is_empty() => end,
            _ => "Present",
        };
        match self.start_date.trim() {
            "" => end.to_string(),
            start => format!("{start} \u{2013} {end}"),
        }
    }
}

impl Education {
    /// "Degree in Field", tolerating either half being blank.
    pub fn credential(&self) -> String {
        match (self.degree.trim(), self.field.trim()) {
            ("", "") => String::new(),
            (degree, "") => degree.to_string(),
            ("", field) => field.to_string(),
            (degree, field) => format!("{degree} in {field}"),
        }
    }
}

pub fn is_open_ended_date(end: Option<&str>) -> bool {
    match end.map(|e| e.trim().to_lowercase()) {
        None => true,
        Some(e) => matches!(e.as_str(), "" | "present" | "current" | "now" | "ongoing"),
    }
}

/// Returns the bullet text as it should be displayed: marker removed,
/// whitespace tidied. The stored bullet keeps its marker.
pub fn display_bullet(bullet: &str) -> String {
    bullet
        .replace(LESS_RELEVANT_MARKER, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_less_relevant(bullet: &str) -> bool {
    bullet.contains(LESS_RELEVANT_MARKER)
}
