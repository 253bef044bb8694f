//! Resume Assembler: renders one `ResumeInput` into the final resume text.
//!
//! Never fails. In ai mode every section falls back to its template form on
//! its own, and if the model never becomes ready the whole call is template mode.

use std::sync::Arc;

use tracing::{info, warn};

use crate::generation::augmenter::{AugmentError, GenerativeAugmenter};
use crate::generation::formatters::{format_education, format_experience, format_skills};
use crate::generation::template::summarize;
use crate::models::resume::{GenerationMode, ResumeInput};

pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const EDUCATION_HEADING: &str = "EDUCATION";
pub const TEMPLATE_SKILLS_HEADING: &str = "SKILLS";
pub const AI_SKILLS_HEADING: &str = "CORE COMPETENCIES";
pub const EXPERIENCE_HEADING: &str = "PROFESSIONAL EXPERIENCE";

const RULE_WIDTH: usize = 80;

/// Section bodies in document order, before headings and rules are added.
struct Sections {
    summary: String,
    education: String,
    skills_heading: &'static str,
    skills: String,
    experience: String,
}

#[derive(Clone, Default)]
pub struct ResumeAssembler {
    /// `None` when no model runtime is configured.
    augmenter: Option<Arc<GenerativeAugmenter>>,
}

impl ResumeAssembler {
    pub fn new(augmenter: Option<Arc<GenerativeAugmenter>>) -> Self {
        Self { augmenter }
    }

    pub async fn generate(&self, input: &ResumeInput, mode: GenerationMode) -> String {
        let sections = match mode {
            GenerationMode::Template => template_sections(input),
            GenerationMode::Ai => match self.ready_augmenter().await {
                Ok(augmenter) => ai_sections(&augmenter, input).await,
                Err(e) => {
                    warn!("{e}, generating in template mode");
                    template_sections(input)
                }
            },
        };

        info!("Assembled resume for {:?} ({mode} mode)", input.name);
        render(input, &sections)
    }

    async fn ready_augmenter(&self) -> Result<Arc<GenerativeAugmenter>, AugmentError> {
        let augmenter = self
            .augmenter
            .as_ref()
            .ok_or(AugmentError::ModelUnavailable)?;
        augmenter.ensure_ready().await?;
        Ok(augmenter.clone())
    }
}

fn template_sections(input: &ResumeInput) -> Sections {
    Sections {
        summary: summarize(&input.education, &input.skills, &input.experience),
        education: format_education(&input.education),
        skills_heading: TEMPLATE_SKILLS_HEADING,
        skills: format_skills(&input.skills),
        experience: format_experience(&input.experience),
    }
}

async fn ai_sections(augmenter: &GenerativeAugmenter, input: &ResumeInput) -> Sections {
    let summary = augmenter
        .ai_summarize(&input.education, &input.skills, &input.experience)
        .await;
    let education = augmenter
        .ai_enhance_education(&input.education, &format_education(&input.education))
        .await;
    let skills = augmenter
        .ai_expand_skills(&input.skills, &format_skills(&input.skills))
        .await;
    let experience = augmenter
        .ai_full_experience(&input.experience, &input.skills, &input.education)
        .await;

    Sections {
        summary,
        education,
        skills_heading: AI_SKILLS_HEADING,
        skills,
        experience,
    }
}

fn render(input: &ResumeInput, sections: &Sections) -> String {
    let mut lines: Vec<String> = vec![
        input.name.to_uppercase(),
        format!("{} | {}", input.email, input.phone),
        "=".repeat(RULE_WIDTH),
        String::new(),
    ];

    let body = [
        (SUMMARY_HEADING, &sections.summary),
        (EDUCATION_HEADING, &sections.education),
        (sections.skills_heading, &sections.skills),
        (EXPERIENCE_HEADING, &sections.experience),
    ];

    for (i, (heading, content)) in body.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(heading.to_string());
        lines.push("-".repeat(RULE_WIDTH));
        lines.push(content.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::augmenter::AI_EXPERIENCE_PLACEHOLDER;
    use crate::generation::formatters::{EDUCATION_PLACEHOLDER, SKILLS_PLACEHOLDER};
    use crate::generation::template::GENERIC_SUMMARY;
    use crate::llm_client::testing::ScriptedGenerator;

    fn jane() -> ResumeInput {
        ResumeInput {
            name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            phone: "555-0100".into(),
            education: "BS CS, MIT".into(),
            skills: "Python, Leadership, SQL".into(),
            experience: "Software Engineer\nBuilt APIs".into(),
        }
    }

    fn name_only() -> ResumeInput {
        ResumeInput {
            name: "Jane Doe".into(),
            ..Default::default()
        }
    }

    fn assert_all_headings(text: &str) {
        for heading in [SUMMARY_HEADING, EDUCATION_HEADING, EXPERIENCE_HEADING] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains(TEMPLATE_SKILLS_HEADING) || text.contains(AI_SKILLS_HEADING));
    }

    #[tokio::test]
    async fn test_template_scenario() {
        let out = ResumeAssembler::default()
            .generate(&jane(), GenerationMode::Template)
            .await;

        assert!(out.starts_with("JANE DOE\njane@x.com | 555-0100\n"));
        assert!(out.contains("Technical Skills: Python, SQL"));
        assert!(out.contains("Professional Skills: Leadership"));
        assert!(out.contains("SOFTWARE ENGINEER"));
        // A short unbulleted line is classified as a job title.
        assert!(out.contains("SOFTWARE ENGINEER\n\nBUILT APIS"));
        assert!(!out.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_bulleted_experience_renders_under_title() {
        let mut input = jane();
        input.experience = "Software Engineer\n- Built APIs".into();
        let out = ResumeAssembler::default()
            .generate(&input, GenerationMode::Template)
            .await;
        assert!(out.contains("SOFTWARE ENGINEER\n  - Built APIs"));
    }

    #[tokio::test]
    async fn test_exact_layout() {
        let input = ResumeInput {
            name: "Al".into(),
            email: "a@b.c".into(),
            phone: "1".into(),
            education: "BS".into(),
            skills: "Rust".into(),
            experience: "- Shipped".into(),
        };
        let out = ResumeAssembler::default()
            .generate(&input, GenerationMode::Template)
            .await;

        let rule_eq = "=".repeat(80);
        let rule = "-".repeat(80);
        let expected = format!(
            "AL\na@b.c | 1\n{rule_eq}\n\n\
             PROFESSIONAL SUMMARY\n{rule}\n{}\n\n\
             EDUCATION\n{rule}\n• BS\n\n\
             SKILLS\n{rule}\nTechnical Skills: Rust\n\n\
             PROFESSIONAL EXPERIENCE\n{rule}\n  - Shipped",
            summarize("BS", "Rust", "- Shipped")
        );
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn test_empty_fields_use_generic_summary_and_all_headings() {
        let assembler = ResumeAssembler::default();
        for mode in [GenerationMode::Template, GenerationMode::Ai] {
            let out = assembler.generate(&name_only(), mode).await;
            assert!(!out.is_empty());
            assert_all_headings(&out);
            assert!(out.contains(&format!("{}\n\n", GENERIC_SUMMARY)));
        }
    }

    #[tokio::test]
    async fn test_empty_fields_with_loaded_model_use_placeholders() {
        // Summary generation yields nothing; the other sections never reach the model.
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let augmenter = Arc::new(GenerativeAugmenter::new(generator.clone()));
        let assembler = ResumeAssembler::new(Some(augmenter));

        let out = assembler.generate(&name_only(), GenerationMode::Ai).await;

        assert_all_headings(&out);
        assert!(out.contains(AI_SKILLS_HEADING));
        assert!(out.contains(&format!("{}\n\n", GENERIC_SUMMARY)));
        assert!(out.contains(&format!("{EDUCATION_HEADING}\n{}\n{EDUCATION_PLACEHOLDER}\n", "-".repeat(80))));
        assert!(out.contains(&format!("{AI_SKILLS_HEADING}\n{}\n{SKILLS_PLACEHOLDER}\n", "-".repeat(80))));
        assert!(out.ends_with(AI_EXPERIENCE_PLACEHOLDER));
        assert_eq!(generator.loads(), 1);
        assert_eq!(generator.generations(), 1);
    }

    #[tokio::test]
    async fn test_missing_augmenter_is_model_unavailable() {
        let err = ResumeAssembler::default().ready_augmenter().await.unwrap_err();
        assert!(matches!(err, AugmentError::ModelUnavailable));
    }

    #[tokio::test]
    async fn test_generic_summary_when_skills_and_experience_blank() {
        let mut input = jane();
        input.skills.clear();
        input.experience.clear();
        let out = ResumeAssembler::default()
            .generate(&input, GenerationMode::Template)
            .await;
        let summary = out
            .split(&format!("{SUMMARY_HEADING}\n{}\n", "-".repeat(80)))
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        assert_eq!(summary, GENERIC_SUMMARY);
    }

    #[tokio::test]
    async fn test_ai_without_model_matches_template_bytes() {
        let assembler = ResumeAssembler::default();
        let template = assembler.generate(&jane(), GenerationMode::Template).await;
        let ai = assembler.generate(&jane(), GenerationMode::Ai).await;
        assert_eq!(ai, template);
    }

    #[tokio::test]
    async fn test_ai_with_failed_load_matches_template_bytes() {
        let generator = Arc::new(ScriptedGenerator::failing_load());
        let augmenter = Arc::new(GenerativeAugmenter::new(generator.clone()));
        let assembler = ResumeAssembler::new(Some(augmenter));

        let template = assembler.generate(&jane(), GenerationMode::Template).await;
        let first = assembler.generate(&jane(), GenerationMode::Ai).await;
        let second = assembler.generate(&jane(), GenerationMode::Ai).await;

        assert_eq!(first, template);
        assert_eq!(second, template);
        assert_eq!(generator.loads(), 1);
        assert_eq!(generator.generations(), 0);
    }

    #[tokio::test]
    async fn test_template_mode_never_touches_model() {
        let generator = Arc::new(ScriptedGenerator::repeating("unused"));
        let augmenter = Arc::new(GenerativeAugmenter::new(generator.clone()));
        let assembler = ResumeAssembler::new(Some(augmenter));

        assembler.generate(&jane(), GenerationMode::Template).await;
        assert_eq!(generator.loads(), 0);
        assert_eq!(generator.generations(), 0);
    }

    #[tokio::test]
    async fn test_ai_sections_fall_back_independently() {
        // Summary accepted; coursework rejected (too short); skills suggestions
        // accepted; both job titles get unusable output and use template bullets.
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("Versatile engineer who ships reliable Python services and leads teams.".into()),
            Ok("CS".into()),
            Ok("Docker, Kubernetes".into()),
            Ok("Create bullet points".into()),
            Ok("Create bullet points".into()),
        ]));
        let augmenter = Arc::new(GenerativeAugmenter::new(generator.clone()));
        let assembler = ResumeAssembler::new(Some(augmenter));

        let out = assembler.generate(&jane(), GenerationMode::Ai).await;

        assert!(out.contains("Versatile engineer who ships reliable Python services and leads teams."));
        assert!(out.contains("EDUCATION\n") && out.contains("• BS CS, MIT\n\nCORE COMPETENCIES"));
        assert!(out.contains(
            "Technical Skills: Python, SQL\nProfessional Skills: Leadership\nAdditional Strengths: Docker, Kubernetes"
        ));
        let engineer = generate_template_bullets("Software Engineer");
        assert!(out.contains(&format!("SOFTWARE ENGINEER\n{engineer}")));
        let built = generate_template_bullets("Built APIs");
        assert!(out.ends_with(&format!("BUILT APIS\n{built}")));
        assert_eq!(generator.generations(), 5);
    }

    fn generate_template_bullets(title: &str) -> String {
        crate::generation::template::generate_template_responsibilities(
            title,
            "Python, Leadership, SQL",
        )
        .join("\n")
    }
}
