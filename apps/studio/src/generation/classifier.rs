//! Text Classifier: splits skill lists into technical vs. soft buckets and tags
//! experience lines as job titles or responsibilities.
//!
//! Both classifiers are pure and stateless. Every formatter and the generative
//! experience assembly share `classify_line`; nothing re-implements the check.

use serde::{Deserialize, Serialize};

/// A skill is soft if it contains any of these, case-insensitively. Everything else is technical.
pub const SOFT_SKILL_KEYWORDS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "management",
    "problem-solving",
    "analytical",
    "creative",
    "collaboration",
];

/// Lines at or above this many characters are always responsibilities.
pub const JOB_TITLE_MAX_CHARS: usize = 100;

/// Markers that flag a line as already bulleted.
pub const BULLET_MARKERS: &[char] = &['•', '-'];

/// Technical and soft skills, each in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBuckets {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

impl SkillBuckets {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty()
    }
}

/// Structural tag for one non-blank experience line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    JobTitle,
    Responsibility,
}

/// Splits a free-text skill list into trimmed, non-empty tokens.
/// Newlines count as commas.
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .replace('\n', ",")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_soft_skill(skill: &str) -> bool {
    let lower = skill.to_lowercase();
    SOFT_SKILL_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Partitions the skill list. Every token lands in exactly one bucket, once per occurrence.
pub fn classify(skills: &str) -> SkillBuckets {
    let mut buckets = SkillBuckets::default();
    for skill in split_skills(skills) {
        if is_soft_skill(&skill) {
            buckets.soft.push(skill);
        } else {
            buckets.technical.push(skill);
        }
    }
    buckets
}

pub fn starts_with_bullet(line: &str) -> bool {
    line.starts_with(BULLET_MARKERS)
}

/// Short, unbulleted lines are job-title candidates; anything else is a responsibility.
/// This is a shape check only: a short sentence is still a "title".
pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();
    if line.chars().count() < JOB_TITLE_MAX_CHARS && !starts_with_bullet(line) {
        LineKind::JobTitle
    } else {
        LineKind::Responsibility
    }
}

/// Trimmed, non-blank lines of a multi-line field.
pub fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}
