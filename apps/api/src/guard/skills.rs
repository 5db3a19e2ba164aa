//! Skill normalization and the soft subset check.

/// Dash and hyphen variants folded into a plain `-`.
const DASHES: &[char] = &[
    '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}', '\u{FE63}',
    '\u{FF0D}',
];

/// Canonical comparison form of a skill.
///
/// Lowercase, trimmed, whitespace collapsed, dash variants unified to `-`,
/// `apis` folded to `api`, and one trailing `s` stripped as a crude plural.
pub fn normalize_skill(skill: &str) -> String {
    let unified: String = skill
        .chars()
        .map(|c| if DASHES.contains(&c) { '-' } else { c })
        .collect();
    let mut out = unified
        .to_lowercase()
        .split_whitespace()
        .map(|word| if word == "apis" { "api" } else { word })
        .collect::<Vec<_>>()
        .join(" ");
    if out.len() > 1 && out.ends_with('s') {
        out.pop();
    }
    out
}

fn strip_dashes(s: &str) -> String {
    s.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

/// Whether two already-normalized skills refer to the same thing: exact match,
/// containment in either direction, or equality once dashes and spaces are
/// removed.
pub fn skill_matches(candidate: &str, original: &str) -> bool {
    if candidate.is_empty() || original.is_empty() {
        return false;
    }
    candidate == original
        || candidate.contains(original)
        || original.contains(candidate)
        || strip_dashes(candidate) == strip_dashes(original)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillFilter {
    /// Skills for the repaired resume, in tailored order.
    pub kept: Vec<String>,
    pub rejected: Vec<String>,
    /// True when nothing survived and the original list was restored.
    pub restored: bool,
}

/// Keeps tailored skills that match an original skill and rejects the rest.
/// If nothing survives, the full original list is restored.
pub fn filter_skills(tailored: &[String], original: &[String]) -> SkillFilter {
    let originals: Vec<String> = original
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect();

    let mut kept = Vec::new();
    let mut rejected = Vec::new();
    for skill in tailored {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            continue;
        }
        let norm = normalize_skill(trimmed);
        if originals.iter().any(|o| skill_matches(&norm, o)) {
            kept.push(trimmed.to_string());
        } else {
            rejected.push(trimmed.to_string());
        }
    }

    let restored = kept.is_empty() && !original.is_empty();
    if restored {
        kept = original.to_vec();
    }
    SkillFilter {
        kept,
        rejected,
        restored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_skill() {
        assert_eq!(normalize_skill("  Machine   Learning "), "machine learning");
        assert_eq!(normalize_skill("Machine\u{2013}Learning"), "machine-learning");
        assert_eq!(normalize_skill("REST APIs"), "rest api");
        assert_eq!(normalize_skill("Microservices"), "microservice");
        assert_eq!(normalize_skill("s"), "s");
    }

    #[test]
    fn test_dash_stripped_equality() {
        let a = normalize_skill("Machine-Learning");
        let b = normalize_skill("Machine Learning");
        assert!(skill_matches(&a, &b));
    }

    #[test]
    fn test_containment_both_directions() {
        let react = normalize_skill("React");
        let react_js = normalize_skill("React.js");
        assert!(skill_matches(&react, &react_js));
        assert!(skill_matches(&react_js, &react));
        assert!(!skill_matches(&normalize_skill("Rust"), &normalize_skill("Go")));
    }

    #[test]
    fn test_filter_keeps_matches_and_reports_rejects() {
        let out = filter_skills(
            &strings(&["Machine-Learning", "Kubernetes", "python"]),
            &strings(&["Machine Learning", "Python"]),
        );
        assert_eq!(out.kept, strings(&["Machine-Learning", "python"]));
        assert_eq!(out.rejected, strings(&["Kubernetes"]));
        assert!(!out.restored);
    }

    #[test]
    fn test_restore_on_empty() {
        let original = strings(&["Rust", "SQL"]);
        let out = filter_skills(&strings(&["Haskell", "Erlang"]), &original);
        assert!(out.restored);
        assert_eq!(out.kept, original);
        assert_eq!(out.rejected.len(), 2);

        let out = filter_skills(&[], &original);
        assert!(out.restored);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn test_every_kept_skill_matches_an_original() {
        let original = strings(&["TypeScript", "Node.js", "PostgreSQL", "AWS Lambda"]);
        let tailored = strings(&[
            "Typescript",
            "Node",
            "Postgres",
            "AWS",
            "Lambda Functions",
            "GraphQL",
        ]);
        let out = filter_skills(&tailored, &original);
        let norm: Vec<String> = original.iter().map(|s| normalize_skill(s)).collect();
        for skill in &out.kept {
            let n = normalize_skill(skill);
            assert!(norm.iter().any(|o| skill_matches(&n, o)), "{skill} slipped through");
        }
        assert!(out.rejected.contains(&"GraphQL".to_string()));
    }
}
