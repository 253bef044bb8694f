use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::export_pdf;
use crate::generation::validation::strip_bullet;
use crate::models::resume::{GenerationMode, ResumeInput};
use crate::state::AppState;
use crate::storage;

#[derive(Parser)]
#[command(name = "resume-studio")]
#[command(about = "Generate resumes from form fields, optionally with a local language model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a resume from a JSON file of form fields
    Generate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = GenerationMode::Template)]
        mode: GenerationMode,
        /// Store the input and the generated text
        #[arg(long)]
        save: bool,
        /// Also write the result to this PDF file
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
    /// List saved inputs and generated resumes, newest first
    List,
    /// Print a saved generated resume
    Show { id: Uuid },
    /// Print a saved input as JSON
    ShowInput { id: Uuid },
    /// Export a saved generated resume to PDF
    Export { id: Uuid, path: PathBuf },
    /// Rewrite one short bullet with the local model
    EnhanceBullet {
        #[arg(long)]
        bullet: String,
        #[arg(long, default_value = "")]
        skills: String,
    },
}

pub async fn run(cli: Cli, state: &AppState) -> Result<(), AppError> {
    match cli.command {
        Command::Generate {
            input,
            mode,
            save,
            pdf,
        } => {
            let resume = read_input(&input).await?;
            let text = generate_in_background(state, resume.clone(), mode).await?;
            println!("{text}");

            if save {
                let input_id = storage::save_resume(&state.db, &resume).await?;
                let title = format!("{} - {mode}", resume.name);
                let generated_id =
                    storage::save_generated(&state.db, &title, &text, mode).await?;
                println!("\nSaved input {input_id}, generated resume {generated_id}");
            }

            if let Some(path) = pdf {
                export_pdf(&text, &path).await?;
                println!("Exported to {}", path.display());
            }
        }

        Command::List => {
            let inputs = storage::list_resumes(&state.db).await?;
            let generated = storage::list_generated(&state.db).await?;

            println!("Saved inputs ({}):", inputs.len());
            for row in inputs {
                println!("  {}  {}  {}", row.id, row.updated_at.format("%Y-%m-%d %H:%M"), row.name);
            }
            println!("Generated resumes ({}):", generated.len());
            for row in generated {
                println!("  {}  {}  {}", row.id, row.created_at.format("%Y-%m-%d %H:%M"), row.title);
            }
        }

        Command::Show { id } => {
            let generated = storage::load_generated(&state.db, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("generated resume {id}")))?;
            println!("{}", generated.content);
        }

        Command::ShowInput { id } => {
            let saved = storage::load_resume(&state.db, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("resume {id}")))?;
            let json = serde_json::to_string_pretty(&saved.into_input())
                .map_err(|e| AppError::Internal(e.into()))?;
            println!("{json}");
        }

        Command::Export { id, path } => {
            let generated = storage::load_generated(&state.db, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("generated resume {id}")))?;
            export_pdf(&generated.content, &path).await?;
            println!("Exported {id} to {}", path.display());
        }

        Command::EnhanceBullet { bullet, skills } => {
            let enhanced = match &state.augmenter {
                Some(augmenter) => {
                    info!("Enhancing bullet with {}", state.config.model_name);
                    augmenter.ai_enhance_bullet(&bullet, &skills).await
                }
                None => {
                    warn!("MODEL_ENDPOINT not set, bullet left as written");
                    strip_bullet(&bullet)
                }
            };
            println!("{enhanced}");
        }
    }

    Ok(())
}

/// Reads a `ResumeInput` JSON file. Only `name` is required.
async fn read_input(path: &Path) -> Result<ResumeInput, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let input: ResumeInput = serde_json::from_str(&raw)
        .map_err(|e| AppError::Validation(format!("invalid input file {}: {e}", path.display())))?;
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    Ok(input)
}

/// Runs generation on its own task so a slow model never blocks the caller's loop.
async fn generate_in_background(
    state: &AppState,
    input: ResumeInput,
    mode: GenerationMode,
) -> Result<String, AppError> {
    let assembler = state.assembler.clone();
    let handle = tokio::spawn(async move { assembler.generate(&input, mode).await });
    handle
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("generation task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::create_pool;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            model_endpoint: None,
            model_name: "test-model".to_string(),
            rust_log: "info".to_string(),
        }
    }

    async fn test_state() -> AppState {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        AppState::new(pool, None, test_config())
    }

    #[test]
    fn test_parse_generate_defaults_to_template() {
        let cli = Cli::try_parse_from(["resume-studio", "generate", "--input", "in.json"]).unwrap();
        match cli.command {
            Command::Generate { mode, save, pdf, .. } => {
                assert_eq!(mode, GenerationMode::Template);
                assert!(!save);
                assert!(pdf.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_ai_mode_and_uuid_argument() {
        let cli = Cli::try_parse_from([
            "resume-studio",
            "generate",
            "--input",
            "in.json",
            "--mode",
            "ai",
            "--save",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Generate { mode: GenerationMode::Ai, save: true, .. }
        ));

        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from(["resume-studio", "show", &id.to_string()]).unwrap();
        assert!(matches!(cli.command, Command::Show { id: parsed } if parsed == id));

        assert!(Cli::try_parse_from(["resume-studio", "show", "not-a-uuid"]).is_err());
    }

    #[tokio::test]
    async fn test_generate_with_save_stores_both_records() {
        let state = test_state().await;
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("jane.json");
        std::fs::write(
            &input,
            r#"{"name": "Jane Doe", "email": "jane@x.com", "skills": "Python, SQL"}"#,
        )
        .unwrap();

        let cli = Cli {
            command: Command::Generate {
                input,
                mode: GenerationMode::Ai,
                save: true,
                pdf: None,
            },
        };
        run(cli, &state).await.unwrap();

        let inputs = storage::list_resumes(&state.db).await.unwrap();
        let generated = storage::list_generated(&state.db).await.unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].title, "Jane Doe - ai");

        let stored = storage::load_generated(&state.db, generated[0].id)
            .await
            .unwrap()
            .unwrap();
        // No model configured: ai mode stores the template rendering.
        let expected = state
            .assembler
            .generate(
                &storage::load_resume(&state.db, inputs[0].id)
                    .await
                    .unwrap()
                    .unwrap()
                    .into_input(),
                GenerationMode::Template,
            )
            .await;
        assert_eq!(stored.content, expected);
        assert_eq!(stored.mode, "ai");
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_name() {
        let state = test_state().await;
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blank.json");
        std::fs::write(&input, r#"{"name": "  "}"#).unwrap();

        let cli = Cli {
            command: Command::Generate {
                input,
                mode: GenerationMode::Template,
                save: false,
                pdf: None,
            },
        };
        let err = run(cli, &state).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_show_unknown_id_is_not_found() {
        let state = test_state().await;
        let cli = Cli {
            command: Command::Show { id: Uuid::new_v4() },
        };
        let err = run(cli, &state).await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_export_saved_resume() {
        let state = test_state().await;
        let id = storage::save_generated(&state.db, "Jane", "JANE DOE", GenerationMode::Template)
            .await
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jane.pdf");

        let cli = Cli {
            command: Command::Export {
                id,
                path: path.clone(),
            },
        };
        run(cli, &state).await.unwrap();
        assert!(path.exists());
    }
}
