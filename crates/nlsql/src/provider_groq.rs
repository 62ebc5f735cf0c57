use async_trait::async_trait;
use std::time::Duration;

use crate::provider::{CompletionProvider, CompletionRequest, ProviderInfo};
use crate::{Result, SynthError};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
pub const CREDENTIAL_VAR: &str = "GROQ_API_KEY";

/// OpenAI-compatible chat completions endpoint (Groq by default).
pub struct GroqProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GroqProvider {
    /// A blank key counts as missing. Nothing is sent until `complete`, and
    /// `complete` refuses to send without a key.
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SynthError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SynthError::MissingCredential(CREDENTIAL_VAR.to_string()))?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let resp = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SynthError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SynthError::Status { status: status.as_u16(), body });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SynthError::Malformed(e.to_string()))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SynthError::Malformed("missing choices[0].message.content".to_string()))
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "groq".to_string(),
            base_url: self.base_url.clone(),
        }
    }

    fn check_credentials(&self) -> Result<()> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(SynthError::MissingCredential(CREDENTIAL_VAR.to_string())),
        }
    }
}
