use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Raw input records, one row per saved form submission.
const CREATE_RESUMES: &str = r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id          BLOB PRIMARY KEY,
        name        TEXT NOT NULL,
        email       TEXT NOT NULL DEFAULT '',
        phone       TEXT NOT NULL DEFAULT '',
        education   TEXT NOT NULL DEFAULT '',
        skills      TEXT NOT NULL DEFAULT '',
        experience  TEXT NOT NULL DEFAULT '',
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
"#;

/// Generated documents, stored as the exact text the assembler returned.
const CREATE_GENERATED: &str = r#"
    CREATE TABLE IF NOT EXISTS generated_resumes (
        id          BLOB PRIMARY KEY,
        title       TEXT NOT NULL,
        content     TEXT NOT NULL,
        mode        TEXT NOT NULL,
        created_at  TEXT NOT NULL
    )
"#;

/// Creates the SQLite pool (creating the database file if needed) and bootstraps the schema.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database {database_url}...");

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // A single connection keeps `sqlite::memory:` databases coherent across queries.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    info!("SQLite pool established");
    Ok(pool)
}

/// Creates both tables if they are absent. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_RESUMES).execute(pool).await?;
    sqlx::query(CREATE_GENERATED).execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_has_both_tables() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert!(tables.contains(&"resumes".to_string()));
        assert!(tables.contains(&"generated_resumes".to_string()));
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();
    }
}
