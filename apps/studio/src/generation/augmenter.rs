//! Generative Augmenter: wraps one local language model and falls back to the
//! template path whenever the model is missing, fails, or writes something unusable.
//!
//! Lifecycle: `Unloaded → (loading) → Ready | Failed`. Loading happens on first
//! use while the state lock is held, so concurrent callers wait for the one load
//! instead of starting their own. `Failed` is permanent for the process.
//!
//! Every operation comes in two forms: `try_*` returns `Result<_, AugmentError>`
//! with the validated payload, and the `ai_*` form never fails; it substitutes
//! the template equivalent for that one section.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::generation::classifier::{classify_line, non_blank_lines, split_skills, LineKind};
use crate::generation::formatters::format_experience;
use crate::generation::prompts::{
    COURSEWORK_PROMPT_TEMPLATE, DEFAULT_SKILLS_EXCERPT, DEFAULT_SUMMARY_SKILLS,
    ENHANCE_BULLET_PROMPT_TEMPLATE, EXPAND_SKILLS_PROMPT_TEMPLATE,
    RESPONSIBILITIES_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE, fill_template,
};
use crate::generation::template::{generate_template_responsibilities, summarize};
use crate::generation::validation::{
    clean_echo, parse_bullets, parse_coursework, parse_skill_suggestions, strip_bullet,
    validate_bullets, validate_enhanced_bullet, validate_summary, ENHANCE_INPUT_MAX_CHARS,
};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{DecodingParams, ModelError, TextGenerator};

/// Placeholder for an empty experience field in ai mode. No model call is made.
pub const AI_EXPERIENCE_PLACEHOLDER: &str =
    "  • Ready to bring dedication and skills to a new role";

/// Character budgets for the fields embedded in the summary prompt.
const SUMMARY_EDUCATION_BUDGET: usize = 80;
const SUMMARY_SKILLS_BUDGET: usize = 100;
const SUMMARY_EXPERIENCE_BUDGET: usize = 150;
/// Skills listed by name in the summary prompt.
const SUMMARY_SKILL_COUNT: usize = 5;
/// Character budget for the skills excerpt in responsibility and enhancement prompts.
const SKILLS_EXCERPT_BUDGET: usize = 100;
const COURSEWORK_EDUCATION_BUDGET: usize = 100;

const MAX_GENERATED_BULLETS: usize = 4;

pub const SUMMARY_PARAMS: DecodingParams = DecodingParams {
    temperature: 0.85,
    top_p: 0.90,
    repetition_penalty: 1.4,
    min_tokens: 30,
    max_tokens: 180,
    no_repeat_ngram_size: None,
};

/// Hotter and more diverse than the summary, to vary phrasing between jobs.
pub const RESPONSIBILITIES_PARAMS: DecodingParams = DecodingParams {
    temperature: 0.95,
    top_p: 0.92,
    repetition_penalty: 1.5,
    min_tokens: 60,
    max_tokens: 250,
    no_repeat_ngram_size: Some(2),
};

pub const ENHANCE_BULLET_PARAMS: DecodingParams = DecodingParams {
    temperature: 0.80,
    top_p: 0.90,
    repetition_penalty: 1.3,
    min_tokens: 10,
    max_tokens: 120,
    no_repeat_ngram_size: None,
};

pub const EXPAND_SKILLS_PARAMS: DecodingParams = DecodingParams {
    temperature: 0.70,
    top_p: 0.90,
    repetition_penalty: 1.3,
    min_tokens: 5,
    max_tokens: 60,
    no_repeat_ngram_size: None,
};

pub const COURSEWORK_PARAMS: DecodingParams = DecodingParams {
    temperature: 0.70,
    top_p: 0.90,
    repetition_penalty: 1.3,
    min_tokens: 10,
    max_tokens: 100,
    no_repeat_ngram_size: None,
};

#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("no model runtime is configured")]
    ModelUnavailable,

    #[error("model failed to load: {0}")]
    ModelLoadFailure(String),

    #[error("generated output rejected: {0}")]
    GenerationInvalid(String),

    #[error("model call failed: {0}")]
    Model(#[from] ModelError),
}

/// Load state of the wrapped model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelState {
    Unloaded,
    Ready,
    Failed,
}

/// Owns the model handle and its load state. Share it behind an `Arc`.
pub struct GenerativeAugmenter {
    generator: Arc<dyn TextGenerator>,
    state: Mutex<ModelState>,
    /// Serialises generation calls; one model instance is never driven in parallel.
    invoke_lock: Mutex<()>,
}

impl std::fmt::Debug for GenerativeAugmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeAugmenter").finish_non_exhaustive()
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

impl GenerativeAugmenter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            state: Mutex::new(ModelState::Unloaded),
            invoke_lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    async fn state(&self) -> ModelState {
        *self.state.lock().await
    }

    /// Loads the model if this is the first call. A failed load is never retried.
    pub async fn ensure_ready(&self) -> Result<(), AugmentError> {
        let mut state = self.state.lock().await;
        match *state {
            ModelState::Ready => Ok(()),
            ModelState::Failed => Err(AugmentError::ModelLoadFailure(
                "an earlier load attempt failed".to_string(),
            )),
            ModelState::Unloaded => {
                info!("Loading language model (first use, this may take a while)...");
                match self.generator.load().await {
                    Ok(()) => {
                        *state = ModelState::Ready;
                        info!("Language model ready");
                        Ok(())
                    }
                    Err(e) => {
                        *state = ModelState::Failed;
                        warn!("Language model failed to load, ai mode disabled for this process: {e}");
                        Err(AugmentError::ModelLoadFailure(e.to_string()))
                    }
                }
            }
        }
    }

    /// One serialised model call. Loads the model first if needed.
    async fn invoke(&self, prompt: &str, params: &DecodingParams) -> Result<String, AugmentError> {
        self.ensure_ready().await?;
        let _guard = self.invoke_lock.lock().await;
        let raw = self
            .generator
            .generate(prompt, PLAIN_TEXT_SYSTEM, params)
            .await?;
        debug!(
            "Raw model output: {:?}",
            raw.chars().take(200).collect::<String>()
        );
        Ok(raw)
    }

    // ── Summary ────────────────────────────────────────────────────────────

    pub async fn try_summarize(
        &self,
        education: &str,
        skills: &str,
        experience: &str,
    ) -> Result<String, AugmentError> {
        let skill_list = split_skills(skills);
        let skills_text = if skill_list.is_empty() {
            DEFAULT_SUMMARY_SKILLS.to_string()
        } else {
            excerpt(
                &skill_list
                    .iter()
                    .take(SUMMARY_SKILL_COUNT)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
                SUMMARY_SKILLS_BUDGET,
            )
        };

        let prompt = fill_template(
            SUMMARY_PROMPT_TEMPLATE,
            &[
                ("education", &excerpt(education, SUMMARY_EDUCATION_BUDGET)),
                ("skills", &skills_text),
                ("experience", &excerpt(experience, SUMMARY_EXPERIENCE_BUDGET)),
                ("grounding_instruction", GROUNDING_INSTRUCTION),
            ],
        );

        let raw = self.invoke(&prompt, &SUMMARY_PARAMS).await?;
        let summary = clean_echo(&raw);
        validate_summary(&summary).map_err(AugmentError::GenerationInvalid)?;
        Ok(summary)
    }

    /// Generated summary, or exactly `template::summarize` for the same fields.
    pub async fn ai_summarize(&self, education: &str, skills: &str, experience: &str) -> String {
        match self.try_summarize(education, skills, experience).await {
            Ok(summary) => {
                info!("Using generated summary ({} chars)", summary.chars().count());
                summary
            }
            Err(e) => {
                warn!("Summary falls back to template: {e}");
                summarize(education, skills, experience)
            }
        }
    }

    // ── Responsibilities ──────────────────────────────────────────────────

    /// Up to four formatted bullets (`"  • …"`) for a bare job title.
    pub async fn try_job_responsibilities(
        &self,
        job_title: &str,
        skills: &str,
        _education: &str,
    ) -> Result<Vec<String>, AugmentError> {
        let skills_text = if skills.trim().is_empty() {
            DEFAULT_SKILLS_EXCERPT.to_string()
        } else {
            excerpt(skills, SKILLS_EXCERPT_BUDGET)
        };

        let prompt = fill_template(
            RESPONSIBILITIES_PROMPT_TEMPLATE,
            &[("job_title", job_title), ("skills", &skills_text)],
        );

        let raw = self.invoke(&prompt, &RESPONSIBILITIES_PARAMS).await?;
        let bullets = parse_bullets(&raw);
        validate_bullets(&bullets).map_err(AugmentError::GenerationInvalid)?;

        Ok(bullets
            .into_iter()
            .take(MAX_GENERATED_BULLETS)
            .map(|b| format!("  • {b}"))
            .collect())
    }

    pub async fn ai_job_responsibilities(
        &self,
        job_title: &str,
        skills: &str,
        education: &str,
    ) -> Vec<String> {
        match self
            .try_job_responsibilities(job_title, skills, education)
            .await
        {
            Ok(bullets) => {
                info!("Generated {} bullets for {job_title:?}", bullets.len());
                bullets
            }
            Err(e) => {
                warn!("Responsibilities for {job_title:?} fall back to template: {e}");
                generate_template_responsibilities(job_title, skills)
            }
        }
    }

    // ── Single bullet ─────────────────────────────────────────────────────

    /// Elaborates a short bullet. Returns the rewrite without a marker.
    pub async fn try_enhance_bullet(
        &self,
        bullet: &str,
        skills: &str,
    ) -> Result<String, AugmentError> {
        let original = strip_bullet(bullet);
        if original.chars().count() >= ENHANCE_INPUT_MAX_CHARS {
            return Err(AugmentError::GenerationInvalid(format!(
                "bullet already {} chars, only short bullets are enhanced",
                original.chars().count()
            )));
        }

        let prompt = fill_template(
            ENHANCE_BULLET_PROMPT_TEMPLATE,
            &[
                ("bullet", &original),
                ("skills", &excerpt(skills, SKILLS_EXCERPT_BUDGET)),
            ],
        );

        let raw = self.invoke(&prompt, &ENHANCE_BULLET_PARAMS).await?;
        let enhanced = strip_bullet(&clean_echo(&raw));
        validate_enhanced_bullet(&original, &enhanced).map_err(AugmentError::GenerationInvalid)?;
        Ok(enhanced)
    }

    /// Rewritten bullet, or the original with whitespace and marker stripped.
    pub async fn ai_enhance_bullet(&self, bullet: &str, skills: &str) -> String {
        match self.try_enhance_bullet(bullet, skills).await {
            Ok(enhanced) => enhanced,
            Err(e) => {
                debug!("Bullet kept as written: {e}");
                strip_bullet(bullet)
            }
        }
    }

    // ── Skills and coursework suggestions ─────────────────────────────────

    pub async fn try_expand_skills(&self, skills: &str) -> Result<Vec<String>, AugmentError> {
        if skills.trim().is_empty() {
            return Err(AugmentError::GenerationInvalid(
                "no skills to build on".to_string(),
            ));
        }

        let prompt = fill_template(
            EXPAND_SKILLS_PROMPT_TEMPLATE,
            &[("skills", &excerpt(skills, SKILLS_EXCERPT_BUDGET))],
        );
        let raw = self.invoke(&prompt, &EXPAND_SKILLS_PARAMS).await?;

        let suggestions = parse_skill_suggestions(&raw, skills);
        if suggestions.is_empty() {
            return Err(AugmentError::GenerationInvalid(
                "no new skills extracted".to_string(),
            ));
        }
        Ok(suggestions)
    }

    /// `base` plus an `Additional Strengths:` line, or `base` unchanged.
    pub async fn ai_expand_skills(&self, skills: &str, base: &str) -> String {
        match self.try_expand_skills(skills).await {
            Ok(suggestions) => format!("{base}\nAdditional Strengths: {}", suggestions.join(", ")),
            Err(e) => {
                debug!("No skill suggestions appended: {e}");
                base.to_string()
            }
        }
    }

    pub async fn try_coursework(&self, education: &str) -> Result<String, AugmentError> {
        if education.trim().is_empty() {
            return Err(AugmentError::GenerationInvalid(
                "no education to build on".to_string(),
            ));
        }

        let prompt = fill_template(
            COURSEWORK_PROMPT_TEMPLATE,
            &[
                ("education", &excerpt(education, COURSEWORK_EDUCATION_BUDGET)),
                ("grounding_instruction", GROUNDING_INSTRUCTION),
            ],
        );
        let raw = self.invoke(&prompt, &COURSEWORK_PARAMS).await?;

        parse_coursework(&raw).map_err(AugmentError::GenerationInvalid)
    }

    /// `base` plus a `Relevant Coursework:` line, or `base` unchanged.
    pub async fn ai_enhance_education(&self, education: &str, base: &str) -> String {
        match self.try_coursework(education).await {
            Ok(coursework) => format!("{base}\nRelevant Coursework: {coursework}"),
            Err(e) => {
                debug!("No coursework appended: {e}");
                base.to_string()
            }
        }
    }

    // ── Experience section ────────────────────────────────────────────────

    /// Rebuilds the experience section: every job title is kept (upper-cased) and
    /// its user-written responsibilities are replaced by generated ones.
    ///
    /// User bullets are superseded, not merged. Responsibility lines before the
    /// first title are dropped. Text with no title at all is formatted as written.
    pub async fn ai_full_experience(
        &self,
        experience: &str,
        skills: &str,
        education: &str,
    ) -> String {
        let lines = non_blank_lines(experience);
        if lines.is_empty() {
            return AI_EXPERIENCE_PLACEHOLDER.to_string();
        }

        let mut formatted: Vec<String> = Vec::new();
        let mut superseded = 0usize;

        for line in lines {
            match classify_line(line) {
                LineKind::JobTitle => {
                    if !formatted.is_empty() {
                        formatted.push(String::new());
                    }
                    formatted.push(line.to_uppercase());
                    info!("Generating responsibilities for {line:?}");
                    formatted.extend(self.ai_job_responsibilities(line, skills, education).await);
                }
                LineKind::Responsibility => superseded += 1,
            }
        }

        if formatted.is_empty() {
            return format_experience(experience);
        }

        if superseded > 0 {
            info!("{superseded} user-written experience lines replaced by generated bullets");
        }
        formatted.join("\n")
    }
}
