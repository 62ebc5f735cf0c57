use anyhow::{Context, Result};
use nlsql::{GroqProvider, QuerySynthesizer, SynthesizerConfig};
use sqlstore::{ExecMode, Store};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::staging::Staging;

pub type SharedState = Arc<AppContext>;

/// Everything a request handler needs. Built once at startup and passed
/// explicitly; nothing here is global.
#[derive(Clone)]
pub struct AppContext {
    pub store: Store,
    pub synthesizer: QuerySynthesizer,
    pub staging: Staging,
    pub exec_mode: ExecMode,
}

impl AppContext {
    pub fn new(store: Store, synthesizer: QuerySynthesizer, staging: Staging, exec_mode: ExecMode) -> Self {
        Self {
            store,
            synthesizer,
            staging,
            exec_mode,
        }
    }

    pub async fn from_config(cfg: &AppConfig) -> Result<Self> {
        let store = Store::open(&cfg.database_path)
            .await
            .with_context(|| format!("Failed to open database at {}", cfg.database_path.display()))?;

        let provider = GroqProvider::new(
            cfg.completion_base_url.clone(),
            cfg.groq_api_key.clone(),
            cfg.completion_timeout,
        )
        .context("Failed to build completion client")?;

        let synthesizer = QuerySynthesizer::new(Arc::new(provider), synthesizer_config(cfg));
        let staging = Staging::new(&cfg.upload_folder, cfg.upload_retention);
        let exec_mode = if cfg.sql_read_only {
            ExecMode::ReadOnly
        } else {
            ExecMode::Verbatim
        };

        Ok(Self::new(store, synthesizer, staging, exec_mode))
    }
}

pub fn synthesizer_config(cfg: &AppConfig) -> SynthesizerConfig {
    SynthesizerConfig {
        include_schema_context: cfg.include_schema,
        row_limit_hint: Some(cfg.default_limit),
        fixed_table_name: cfg.fixed_table.clone(),
        model: cfg.completion_model.clone(),
        temperature: cfg.completion_temperature,
    }
}
