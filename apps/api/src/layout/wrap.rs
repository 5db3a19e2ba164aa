//! Greedy word wrap with injected width measurement.
//!
//! Words accumulate on a line while `measure(line + " " + word) <= max_width`.
//! A word that overflows on its own is emitted as a single (overflowing) line;
//! words are never split. The output is a pure function of the inputs, so
//! wrapping is restartable and repeatable.

/// Wraps `text` into lines no wider than `max_width` as judged by `measure`.
///
/// Runs of whitespace (including newlines) are treated as single separators.
/// Empty or whitespace-only input produces no lines.
pub fn wrap<F>(text: &str, measure: F, max_width: f32) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate_len = current.len() + 1 + word.len();
        let mut candidate = String::with_capacity(candidate_len);
        candidate.push_str(&current);
        candidate.push(' ');
        candidate.push_str(word);

        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            // Line is full; the overflowing word starts the next one.
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Number of lines `text` occupies; shorthand used by height estimates.
pub fn line_count<F>(text: &str, measure: F, max_width: f32) -> usize
where
    F: Fn(&str) -> f32,
{
    wrap(text, measure, max_width).len()
}
