//! Section Formatters: turn raw multi-line user text into resume-section layout.
//!
//! All three are pure and total. Both generation modes render skills and education
//! through these; the ai path only appends suggestion lines after them.

use crate::generation::classifier::{
    classify, classify_line, non_blank_lines, starts_with_bullet, LineKind,
};

pub const SKILLS_PLACEHOLDER: &str = "• To be added based on role requirements";
pub const EXPERIENCE_PLACEHOLDER: &str = "• Ready to bring dedication and skills to a new role";
pub const EDUCATION_PLACEHOLDER: &str = "• Educational background to be provided";

/// Renders the skills section as labelled technical/professional lines.
pub fn format_skills(skills: &str) -> String {
    if skills.is_empty() {
        return SKILLS_PLACEHOLDER.to_string();
    }

    let buckets = classify(skills);
    if buckets.is_empty() {
        // Only separators or whitespace were typed: one bullet per raw token.
        return skills
            .replace('\n', ",")
            .split(',')
            .map(|token| format!("• {}", token.trim()))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut lines = Vec::new();
    if !buckets.technical.is_empty() {
        lines.push(format!("Technical Skills: {}", buckets.technical.join(", ")));
    }
    if !buckets.soft.is_empty() {
        lines.push(format!("Professional Skills: {}", buckets.soft.join(", ")));
    }
    lines.join("\n")
}

/// Renders one experience line that is not a job title.
pub fn format_responsibility(line: &str) -> String {
    if starts_with_bullet(line) {
        format!("  {line}")
    } else {
        format!("  • {line}")
    }
}

/// Upper-cases job titles (blank line before every title but the first) and
/// indents responsibilities as bullets.
pub fn format_experience(experience: &str) -> String {
    let lines = non_blank_lines(experience);
    if lines.is_empty() {
        return EXPERIENCE_PLACEHOLDER.to_string();
    }

    let mut formatted: Vec<String> = Vec::with_capacity(lines.len() + 4);
    for line in lines {
        match classify_line(line) {
            LineKind::JobTitle => {
                if !formatted.is_empty() {
                    formatted.push(String::new());
                }
                formatted.push(line.to_uppercase());
            }
            LineKind::Responsibility => formatted.push(format_responsibility(line)),
        }
    }

    formatted.join("\n")
}

/// Prefixes each education line with a bullet unless it already has one.
pub fn format_education(education: &str) -> String {
    let lines = non_blank_lines(education);
    if lines.is_empty() {
        return EDUCATION_PLACEHOLDER.to_string();
    }

    lines
        .into_iter()
        .map(|line| {
            if starts_with_bullet(line) {
                line.to_string()
            } else {
                format!("• {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_skills_both_buckets() {
        assert_eq!(
            format_skills("Python, Leadership, SQL"),
            "Technical Skills: Python, SQL\nProfessional Skills: Leadership"
        );
    }

    #[test]
    fn test_format_skills_single_bucket_has_no_trailing_newline() {
        assert_eq!(format_skills("Rust, Go"), "Technical Skills: Rust, Go");
        assert_eq!(
            format_skills("Communication\nTeamwork"),
            "Professional Skills: Communication, Teamwork"
        );
    }

    #[test]
    fn test_format_skills_empty_is_placeholder() {
        assert_eq!(format_skills(""), SKILLS_PLACEHOLDER);
    }

    #[test]
    fn test_format_skills_whitespace_only_is_not_placeholder() {
        assert_eq!(format_skills("   "), "• ");
        assert_eq!(format_skills("   \n "), "• \n• ");
    }

    #[test]
    fn test_format_skills_separator_only_falls_back_to_bullets() {
        assert_eq!(format_skills(" , "), "• \n• ");
    }

    #[test]
    fn test_format_experience_titles_and_bullets() {
        let out = format_experience("Software Engineer\nBuilt APIs that served millions of requests per day across several regions worldwide.\n\nTech Lead\n- Ran standups");
        let expected = "SOFTWARE ENGINEER\n  • Built APIs that served millions of requests per day across several regions worldwide.\n\nTECH LEAD\n  - Ran standups";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_format_experience_short_line_is_a_title() {
        // "Built APIs" is short and unbulleted, so it reads as a title.
        assert_eq!(
            format_experience("Software Engineer\nBuilt APIs"),
            "SOFTWARE ENGINEER\n\nBUILT APIS"
        );
    }

    #[test]
    fn test_format_experience_empty_is_placeholder() {
        assert_eq!(format_experience(""), EXPERIENCE_PLACEHOLDER);
        assert_eq!(format_experience("\n  \n"), EXPERIENCE_PLACEHOLDER);
    }

    #[test]
    fn test_format_education_bullets_each_line_once() {
        assert_eq!(
            format_education("BS CS, MIT\n\n• MBA, Wharton\n- Coursera ML"),
            "• BS CS, MIT\n• MBA, Wharton\n- Coursera ML"
        );
    }

    #[test]
    fn test_format_education_empty_is_placeholder() {
        assert_eq!(format_education(""), EDUCATION_PLACEHOLDER);
    }

    #[test]
    fn test_format_responsibility_respects_existing_marker() {
        assert_eq!(format_responsibility("• Shipped"), "  • Shipped");
        assert_eq!(format_responsibility("Shipped"), "  • Shipped");
    }
}
