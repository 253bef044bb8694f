//! Persistence for raw form inputs and generated documents.
//!
//! Two tables, create/read/list only. The synthesis engine never touches this
//! module; callers persist what they fed in and what came out.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{
    GeneratedResume, GeneratedSummary, GenerationMode, ResumeInput, ResumeSummary, SavedResume,
};

/// Inserts a form submission and returns its id.
pub async fn save_resume(pool: &SqlitePool, input: &ResumeInput) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO resumes
            (id, name, email, phone, education, skills, experience, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.education)
    .bind(&input.skills)
    .bind(&input.experience)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    info!("Saved resume input {id} for {:?}", input.name);
    Ok(id)
}

pub async fn load_resume(pool: &SqlitePool, id: Uuid) -> Result<Option<SavedResume>> {
    let row = sqlx::query_as::<_, SavedResume>("SELECT * FROM resumes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lists saved inputs, most recently updated first.
pub async fn list_resumes(pool: &SqlitePool) -> Result<Vec<ResumeSummary>> {
    let rows = sqlx::query_as::<_, ResumeSummary>(
        "SELECT id, name, updated_at FROM resumes ORDER BY updated_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Stores a generated document verbatim and returns its id.
pub async fn save_generated(
    pool: &SqlitePool,
    title: &str,
    content: &str,
    mode: GenerationMode,
) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO generated_resumes (id, title, content, mode, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .bind(mode.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;

    info!("Saved generated resume {id} ({mode} mode, {} chars)", content.len());
    Ok(id)
}

pub async fn load_generated(pool: &SqlitePool, id: Uuid) -> Result<Option<GeneratedResume>> {
    let row = sqlx::query_as::<_, GeneratedResume>("SELECT * FROM generated_resumes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lists generated documents, newest first.
pub async fn list_generated(pool: &SqlitePool) -> Result<Vec<GeneratedSummary>> {
    let rows = sqlx::query_as::<_, GeneratedSummary>(
        "SELECT id, title, created_at FROM generated_resumes ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
