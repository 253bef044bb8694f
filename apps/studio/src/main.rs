mod cli;
mod config;
mod db;
mod errors;
mod export;
mod generation;
mod llm_client;
mod models;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::db::create_pool;
use crate::generation::augmenter::GenerativeAugmenter;
use crate::llm_client::LocalModelClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging (stderr, so generated text on stdout stays clean)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-studio v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    // The model is not loaded here; the augmenter loads it on first ai-mode use.
    let augmenter = match &config.model_endpoint {
        Some(endpoint) => {
            let client = LocalModelClient::new(endpoint.clone(), config.model_name.clone());
            info!("Model runtime configured: {} at {endpoint}", client.model());
            Some(Arc::new(GenerativeAugmenter::new(Arc::new(client))))
        }
        None => {
            info!("MODEL_ENDPOINT not set, ai mode will use templates");
            None
        }
    };

    let state = AppState::new(db, augmenter, config);

    if let Err(e) = cli::run(cli, &state).await {
        eprintln!("error [{}]: {e}", e.code());
        std::process::exit(1);
    }

    Ok(())
}
