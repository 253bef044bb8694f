use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The six fields collected by the form. Only `name` is checked (by the caller);
/// every other field may be empty and the engine renders a placeholder for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub education: String,
    pub skills: String,
    pub experience: String,
}

/// Which synthesis path the assembler takes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Deterministic templates only.
    #[default]
    Template,
    /// Local language model, falling back to templates section by section.
    Ai,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Template => "template",
            GenerationMode::Ai => "ai",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedResume {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub education: String,
    pub skills: String,
    pub experience: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedResume {
    pub fn into_input(self) -> ResumeInput {
        ResumeInput {
            name: self.name,
            email: self.email,
            phone: self.phone,
            education: self.education,
            skills: self.skills,
            experience: self.experience,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeneratedResume {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// "template" or "ai", as returned by `GenerationMode::as_str`.
    pub mode: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeneratedSummary {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_input_missing_fields_default_to_empty() {
        let input: ResumeInput = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        assert_eq!(input.name, "Jane Doe");
        assert!(input.email.is_empty());
        assert!(input.experience.is_empty());
    }

    #[test]
    fn test_generation_mode_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&GenerationMode::Ai).unwrap(), r#""ai""#);
        let mode: GenerationMode = serde_json::from_str(r#""template""#).unwrap();
        assert_eq!(mode, GenerationMode::Template);
    }

    #[test]
    fn test_generation_mode_default_is_template() {
        assert_eq!(GenerationMode::default(), GenerationMode::Template);
        assert_eq!(GenerationMode::Ai.to_string(), "ai");
    }
}
