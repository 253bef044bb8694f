use anyhow::Result;

const DEFAULT_DATABASE_URL: &str = "sqlite://resumes.db";
const DEFAULT_MODEL_NAME: &str = "llama3.2:1b";

/// Application configuration loaded from environment variables.
/// Every variable has a default except `MODEL_ENDPOINT`, whose absence disables ai mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the local model runtime, e.g. `http://127.0.0.1:11434`.
    pub model_endpoint: Option<String>,
    pub model_name: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            model_endpoint: optional_env("MODEL_ENDPOINT"),
            model_name: env_or("MODEL_NAME", DEFAULT_MODEL_NAME),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
