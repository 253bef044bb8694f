//! Output cleaning and acceptance checks for generated text.
//!
//! Each predicate is a named pure function so the augmenter's fallback decisions
//! can be tested without a model. A `Err(reason)` means "discard and fall back".

use crate::generation::classifier::split_skills;

/// Summary length bounds, exclusive.
pub const SUMMARY_MIN_CHARS: usize = 40;
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Responsibility bullet length bounds, exclusive.
pub const BULLET_MIN_CHARS: usize = 15;
pub const BULLET_MAX_CHARS: usize = 300;
pub const MIN_GENERATED_BULLETS: usize = 2;

/// Enhanced bullets must stay under this many characters.
pub const ENHANCED_BULLET_MAX_CHARS: usize = 250;
/// Only bullets shorter than this are sent for enhancement.
pub const ENHANCE_INPUT_MAX_CHARS: usize = 100;

/// Suggested skill length bounds, inclusive.
pub const SKILL_MIN_CHARS: usize = 2;
pub const SKILL_MAX_CHARS: usize = 40;
pub const MAX_SUGGESTED_SKILLS: usize = 3;

/// Coursework paragraph length bounds, inclusive.
pub const COURSEWORK_MIN_CHARS: usize = 10;
pub const COURSEWORK_MAX_CHARS: usize = 200;

/// Openings that mean the model echoed the instruction back.
const ECHO_PREFIXES: &[&str] = &["write", "create", "summary", "the summary"];

/// Literal instruction fragments removed from any cleaned output.
const ECHO_FRAGMENTS: &[&str] = &["Write a professional resume summary", "(2-3 sentences)"];

/// Labels a model may put in front of a list it was asked for.
const SKILL_LABELS: &[&str] = &["additional skills", "additional strengths", "skills"];
const COURSEWORK_LABELS: &[&str] = &["relevant coursework", "coursework", "courses"];

/// Lines containing any of these are instruction echo, not content.
const ECHO_VOCABULARY: &[&str] = &[
    "create",
    "bullet point",
    "resume",
    "should describe",
    "each bullet",
];

/// Leading characters stripped from generated list items.
const LIST_MARKER_CHARS: &[char] = &[
    '•', '-', '*', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '.', ' ',
];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Strips a leading instruction echo: text after the first colon, else after the
/// first newline. Then removes known instruction fragments and trims.
pub fn clean_echo(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    let lower = text.to_lowercase();
    if ECHO_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        if let Some((_, rest)) = text.split_once(':') {
            text = rest.trim().to_string();
        } else if let Some((_, rest)) = text.split_once('\n') {
            text = rest.trim().to_string();
        }
    }

    for fragment in ECHO_FRAGMENTS {
        text = text.replace(fragment, "");
    }
    text.trim().to_string()
}

/// Accepts a cleaned summary strictly between the length bounds.
pub fn validate_summary(summary: &str) -> Result<(), String> {
    let len = char_len(summary);
    if len > SUMMARY_MIN_CHARS && len < SUMMARY_MAX_CHARS {
        Ok(())
    } else {
        Err(format!(
            "summary length {len} outside ({SUMMARY_MIN_CHARS}, {SUMMARY_MAX_CHARS})"
        ))
    }
}

fn is_echo(text: &str) -> bool {
    let lower = text.to_lowercase();
    ECHO_VOCABULARY.iter().any(|v| lower.contains(v))
}

fn strip_list_marker(text: &str) -> &str {
    text.trim_start_matches(LIST_MARKER_CHARS)
}

fn bullet_text_ok(text: &str) -> bool {
    let len = char_len(text);
    len > BULLET_MIN_CHARS && len < BULLET_MAX_CHARS && !is_echo(text)
}

/// Extracts responsibility texts (unformatted) from raw model output.
///
/// Line-by-line first; if that yields fewer than two items, the whole output is
/// re-split on sentence ends under the same filters.
pub fn parse_bullets(raw: &str) -> Vec<String> {
    let by_line: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !is_echo(line))
        .map(strip_list_marker)
        .filter(|line| bullet_text_ok(line))
        .map(str::to_string)
        .collect();

    if by_line.len() >= MIN_GENERATED_BULLETS {
        return by_line;
    }

    raw.replace(". ", ".|")
        .split('|')
        .map(|sentence| sentence.trim().trim_matches('.').trim())
        .map(strip_list_marker)
        .filter(|sentence| bullet_text_ok(sentence))
        .map(str::to_string)
        .collect()
}

/// Accepts a parsed bullet list with at least two items.
pub fn validate_bullets(bullets: &[String]) -> Result<(), String> {
    if bullets.len() >= MIN_GENERATED_BULLETS {
        Ok(())
    } else {
        Err(format!(
            "only {} usable bullets (need {MIN_GENERATED_BULLETS})",
            bullets.len()
        ))
    }
}

/// Removes surrounding whitespace and leading bullet markers.
pub fn strip_bullet(bullet: &str) -> String {
    bullet
        .trim()
        .trim_start_matches(['•', '-', '*'])
        .trim()
        .to_string()
}

/// A rewrite is kept only if it says more than the original and stays short.
pub fn validate_enhanced_bullet(original: &str, enhanced: &str) -> Result<(), String> {
    let before = char_len(original);
    let after = char_len(enhanced);
    if after <= before {
        return Err(format!("rewrite not longer than original ({after} <= {before})"));
    }
    if after >= ENHANCED_BULLET_MAX_CHARS {
        return Err(format!(
            "rewrite too long ({after} >= {ENHANCED_BULLET_MAX_CHARS})"
        ));
    }
    Ok(())
}

/// Extracts up to three new skills not already present in `existing`.
pub fn parse_skill_suggestions(raw: &str, existing: &str) -> Vec<String> {
    let known: Vec<String> = split_skills(existing)
        .iter()
        .map(|s| s.to_lowercase())
        .collect();

    let mut suggestions: Vec<String> = Vec::new();
    let cleaned = clean_echo(raw);
    for token in strip_label(&cleaned, SKILL_LABELS).split(['\n', ',']) {
        let token = strip_list_marker(token.trim()).trim().trim_end_matches('.');
        let len = char_len(token);
        if !(SKILL_MIN_CHARS..=SKILL_MAX_CHARS).contains(&len) || is_echo(token) {
            continue;
        }
        let lower = token.to_lowercase();
        if known.contains(&lower) || suggestions.iter().any(|s| s.to_lowercase() == lower) {
            continue;
        }
        suggestions.push(token.to_string());
        if suggestions.len() == MAX_SUGGESTED_SKILLS {
            break;
        }
    }
    suggestions
}

/// Collapses model output into one coursework paragraph, or rejects it.
pub fn parse_coursework(raw: &str) -> Result<String, String> {
    let cleaned = clean_echo(raw);
    let joined = strip_label(&cleaned, COURSEWORK_LABELS)
        .lines()
        .map(|line| strip_list_marker(line.trim()))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let paragraph = joined.split_whitespace().collect::<Vec<_>>().join(" ");

    let len = char_len(&paragraph);
    if is_echo(&paragraph) {
        return Err("coursework echoes the instruction".to_string());
    }
    if !(COURSEWORK_MIN_CHARS..=COURSEWORK_MAX_CHARS).contains(&len) {
        return Err(format!(
            "coursework length {len} outside [{COURSEWORK_MIN_CHARS}, {COURSEWORK_MAX_CHARS}]"
        ));
    }
    Ok(paragraph)
}

/// Drops a leading `Label:` when the text opens with one of `labels` (case-insensitive).
fn strip_label<'a>(text: &'a str, labels: &[&str]) -> &'a str {
    let lower = text.to_lowercase();
    for label in labels {
        if lower.starts_with(label) {
            // Labels are ASCII, so the byte offset is valid in `text` too.
            if let Some(rest) = text[label.len()..].trim_start().strip_prefix(':') {
                return rest.trim();
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_echo_takes_text_after_colon() {
        let raw = "Summary: Skilled engineer with deep Python experience and a focus on delivery.";
        assert_eq!(
            clean_echo(raw),
            "Skilled engineer with deep Python experience and a focus on delivery."
        );
    }

    #[test]
    fn test_clean_echo_falls_back_to_newline() {
        let raw = "Write a summary\nSkilled engineer.";
        assert_eq!(clean_echo(raw), "Skilled engineer.");
    }

    #[test]
    fn test_clean_echo_leaves_normal_text_alone() {
        let raw = "  Skilled engineer: Python and SQL.  ";
        assert_eq!(clean_echo(raw), "Skilled engineer: Python and SQL.");
    }

    #[test]
    fn test_clean_echo_removes_instruction_fragments() {
        let raw = "Great engineer (2-3 sentences)";
        assert_eq!(clean_echo(raw), "Great engineer");
    }

    #[test]
    fn test_validate_summary_bounds_are_exclusive() {
        assert!(validate_summary(&"a".repeat(40)).is_err());
        assert!(validate_summary(&"a".repeat(41)).is_ok());
        assert!(validate_summary(&"a".repeat(499)).is_ok());
        assert!(validate_summary(&"a".repeat(500)).is_err());
    }

    #[test]
    fn test_parse_bullets_by_line_strips_markers_and_echo() {
        let raw = "Create 4 resume bullet points:\n1. Designed REST services for payments\n- Reduced build times by 40 percent\n• ok\n* Mentored four junior developers on testing";
        let bullets = parse_bullets(raw);
        assert_eq!(
            bullets,
            vec![
                "Designed REST services for payments",
                "Reduced build times by 40 percent",
                "Mentored four junior developers on testing",
            ]
        );
    }

    #[test]
    fn test_parse_bullets_falls_back_to_sentences() {
        let raw = "Designed REST services for payments. Reduced build times by forty percent. Ok.";
        let bullets = parse_bullets(raw);
        assert_eq!(
            bullets,
            vec![
                "Designed REST services for payments",
                "Reduced build times by forty percent",
            ]
        );
    }

    #[test]
    fn test_parse_bullets_rejects_pure_echo() {
        let raw = "Create 4 professional resume bullet points for a Software Engineer position";
        assert!(parse_bullets(raw).is_empty());
        assert!(validate_bullets(&parse_bullets(raw)).is_err());
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("  • Built APIs "), "Built APIs");
        assert_eq!(strip_bullet("- Built APIs"), "Built APIs");
    }

    #[test]
    fn test_validate_enhanced_bullet() {
        assert!(validate_enhanced_bullet("Built APIs", "Built APIs").is_err());
        assert!(validate_enhanced_bullet("Built APIs", "Built REST APIs in Python").is_ok());
        assert!(validate_enhanced_bullet("Built APIs", &"x".repeat(250)).is_err());
    }

    #[test]
    fn test_parse_skill_suggestions_skips_known_and_duplicates() {
        let raw = "Docker, python, Kubernetes\n- docker\nTerraform, CI/CD";
        let suggestions = parse_skill_suggestions(raw, "Python, SQL");
        assert_eq!(suggestions, vec!["Docker", "Kubernetes", "Terraform"]);
    }

    #[test]
    fn test_parse_skill_suggestions_drops_out_of_range_tokens() {
        let long = "x".repeat(41);
        let raw = format!("a, {long}, Git");
        assert_eq!(parse_skill_suggestions(&raw, ""), vec!["Git"]);
    }

    #[test]
    fn test_parse_coursework_collapses_whitespace() {
        let raw = "Coursework: Algorithms,\n  Distributed Systems,\n  Machine Learning";
        assert_eq!(
            parse_coursework(raw).unwrap(),
            "Algorithms, Distributed Systems, Machine Learning"
        );
    }

    #[test]
    fn test_parse_skill_suggestions_strips_label() {
        let raw = "Additional skills: Docker, Git";
        assert_eq!(parse_skill_suggestions(raw, ""), vec!["Docker", "Git"]);
    }

    #[test]
    fn test_parse_coursework_rejects_short_output() {
        assert!(parse_coursework("CS101").is_err());
    }
}
