use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::generation::assembler::ResumeAssembler;
use crate::generation::augmenter::GenerativeAugmenter;

/// Shared handles passed to every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub assembler: ResumeAssembler,
    /// `None` when `MODEL_ENDPOINT` is unset. The assembler holds the same handle.
    pub augmenter: Option<Arc<GenerativeAugmenter>>,
    pub config: Config,
}

impl AppState {
    pub fn new(db: SqlitePool, augmenter: Option<Arc<GenerativeAugmenter>>, config: Config) -> Self {
        Self {
            db,
            assembler: ResumeAssembler::new(augmenter.clone()),
            augmenter,
            config,
        }
    }
}
