//! Template Synthesizer: deterministic summary and responsibility text, no model.
//!
//! Also the fallback target for every generative call, so its output must be
//! reproducible: same input, same bytes.
//!
//! # Seeding contract
//! Responsibility sampling is seeded from the job title: the first 8 bytes
//! (little-endian) of SHA-256 over the title's UTF-8 bytes, exactly as given,
//! feed `StdRng::seed_from_u64`; `rand::seq::index::sample` then picks up to 4
//! of the bucket's 6 bullets, kept in sample order.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::generation::classifier::{non_blank_lines, split_skills};

pub const GENERIC_SUMMARY: &str = "Motivated professional seeking new opportunities to leverage skills and contribute to organizational success.";

/// Maximum bullets returned for one job.
pub const MAX_RESPONSIBILITIES: usize = 4;

/// Role family inferred from a job title by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleBucket {
    Developer,
    Manager,
    Analyst,
    Designer,
    Generic,
}

/// Checked in declaration order; the first bucket with a matching keyword wins.
const ROLE_KEYWORDS: &[(RoleBucket, &[&str])] = &[
    (
        RoleBucket::Developer,
        &["developer", "engineer", "programmer", "software"],
    ),
    (
        RoleBucket::Manager,
        &["manager", "lead", "supervisor", "director"],
    ),
    (RoleBucket::Analyst, &["analyst", "data", "research"]),
    (RoleBucket::Designer, &["designer", "creative", "ui", "ux"]),
];

const DEVELOPER_BULLETS: [&str; 6] = [
    "  • Developed and maintained software applications using modern technologies and frameworks",
    "  • Designed and implemented scalable solutions to meet business requirements",
    "  • Collaborated with cross-functional teams to deliver projects on schedule",
    "  • Participated in code reviews and maintained high code quality standards",
    "  • Optimized database queries and improved application performance by 30%",
    "  • Implemented best practices for code quality, testing, and documentation",
];

const MANAGER_BULLETS: [&str; 6] = [
    "  • Led team initiatives and coordinated project deliverables across departments",
    "  • Managed cross-functional teams to achieve strategic objectives",
    "  • Improved team efficiency through process optimization and automation",
    "  • Developed and executed strategic plans aligned with company goals",
    "  • Mentored team members and fostered professional development",
    "  • Built and maintained relationships with key stakeholders and clients",
];

const ANALYST_BULLETS: [&str; 6] = [
    "  • Analyzed complex data sets to drive business insights and recommendations",
    "  • Created comprehensive reports and visualizations for stakeholders",
    "  • Identified trends and opportunities for operational improvements",
    "  • Collaborated with business units to define metrics and reporting requirements",
    "  • Automated reporting processes to improve efficiency and accuracy",
    "  • Maintained data quality and integrity across multiple systems",
];

const DESIGNER_BULLETS: [&str; 6] = [
    "  • Created user-centered designs that improved engagement and satisfaction",
    "  • Collaborated with stakeholders to understand requirements and objectives",
    "  • Maintained brand consistency across all deliverables and touchpoints",
    "  • Produced wireframes, mockups, and prototypes for new features",
    "  • Conducted user research and usability testing to inform design decisions",
    "  • Managed multiple design projects with competing deadlines",
];

const GENERIC_BULLETS: [&str; 6] = [
    "  • Contributed to team objectives and organizational goals",
    "  • Demonstrated strong problem-solving and analytical skills",
    "  • Collaborated effectively with colleagues and stakeholders",
    "  • Managed multiple priorities in fast-paced environment",
    "  • Maintained excellent communication with internal and external partners",
    "  • Provided excellent customer service and support",
];

impl RoleBucket {
    /// Case-insensitive substring match against the bucket keywords.
    pub fn from_title(job_title: &str) -> Self {
        let lower = job_title.to_lowercase();
        ROLE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(bucket, _)| *bucket)
            .unwrap_or(RoleBucket::Generic)
    }

    pub fn bullet_pool(&self) -> &'static [&'static str] {
        match self {
            RoleBucket::Developer => &DEVELOPER_BULLETS,
            RoleBucket::Manager => &MANAGER_BULLETS,
            RoleBucket::Analyst => &ANALYST_BULLETS,
            RoleBucket::Designer => &DESIGNER_BULLETS,
            RoleBucket::Generic => &GENERIC_BULLETS,
        }
    }
}

/// Builds the three-sentence professional summary.
pub fn summarize(_education: &str, skills: &str, experience: &str) -> String {
    let has_skills = !skills.trim().is_empty();
    let has_experience = !experience.trim().is_empty();

    if !has_skills && !has_experience {
        return GENERIC_SUMMARY.to_string();
    }

    let skill_list = split_skills(skills);
    let top_skills = if skill_list.len() >= 3 {
        skill_list[..3].join(", ")
    } else {
        skills.to_string()
    };

    if has_experience {
        let qualifier = if mentions_years(experience) {
            "Seasoned"
        } else {
            "Experienced"
        };
        format!(
            "{qualifier} professional with proven expertise in {top_skills}. \
             Demonstrated track record of delivering results and contributing to team success. \
             Strong analytical and problem-solving abilities with excellent communication skills."
        )
    } else {
        format!(
            "Motivated professional with strong foundation in {top_skills}. \
             Quick learner with excellent analytical and communication skills. \
             Seeking to contribute skills and grow professionally in a dynamic environment."
        )
    }
}

/// True if any experience line contains "year" (which also covers "years").
fn mentions_years(experience: &str) -> bool {
    non_blank_lines(experience)
        .iter()
        .any(|line| line.to_lowercase().contains("year"))
}

/// Stable 64-bit seed for a job title. See the module-level seeding contract.
pub fn title_seed(job_title: &str) -> u64 {
    let digest = Sha256::digest(job_title.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Picks up to four role-appropriate bullets for a job title, reproducibly.
pub fn generate_template_responsibilities(job_title: &str, skills: &str) -> Vec<String> {
    let pool = RoleBucket::from_title(job_title).bullet_pool();

    let mut rng = StdRng::seed_from_u64(title_seed(job_title));
    let amount = MAX_RESPONSIBILITIES.min(pool.len());
    let mut bullets: Vec<String> = rand::seq::index::sample(&mut rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i].to_string())
        .collect();

    let top_skills: Vec<&str> = if skills.is_empty() {
        Vec::new()
    } else {
        skills.split(',').take(3).map(str::trim).collect()
    };

    if !top_skills.is_empty() && bullets.len() < MAX_RESPONSIBILITIES {
        let named = top_skills
            .iter()
            .take(2)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        bullets.insert(
            0,
            format!("  • Utilized {named} to deliver high-quality results"),
        );
    }

    bullets.truncate(MAX_RESPONSIBILITIES);
    bullets
}
