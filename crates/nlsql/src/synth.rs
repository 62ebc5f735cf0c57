use serde::Serialize;
use sqlstore::SchemaDescription;
use std::sync::Arc;
use tracing::{debug, info};

use crate::prompt::{build_prompt, SynthesizerConfig, SYSTEM_ROLE};
use crate::provider::{ChatMessage, CompletionProvider, CompletionRequest};
use crate::{extract_sql, Result};

/// A statement produced for one request. Not stored anywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedQuery {
    pub request: String,
    pub sql: String,
}

/// Turns natural language into one SQL statement via a completion provider.
#[derive(Clone)]
pub struct QuerySynthesizer {
    provider: Arc<dyn CompletionProvider>,
    config: SynthesizerConfig,
}

impl QuerySynthesizer {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: SynthesizerConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    /// Whether `synthesize` makes use of a schema description.
    pub fn wants_schema(&self) -> bool {
        self.config.include_schema_context
    }

    pub fn build_request(&self, request: &str, schema: Option<&SchemaDescription>) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_ROLE),
                ChatMessage::user(build_prompt(request, schema, &self.config)),
            ],
            temperature: self.config.temperature,
        }
    }

    pub async fn synthesize(&self, request: &str, schema: Option<&SchemaDescription>) -> Result<SynthesizedQuery> {
        self.provider.check_credentials()?;

        let completion_request = self.build_request(request, schema);
        debug!(
            provider = %self.provider.info().name,
            model = %completion_request.model,
            "requesting completion"
        );

        let raw = self.provider.complete(&completion_request).await?;
        let sql = extract_sql(&raw)?;
        info!(sql = %sql, "generated SQL");

        Ok(SynthesizedQuery {
            request: request.to_string(),
            sql,
        })
    }
}
