#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use nlsql::{CompletionProvider, CompletionRequest, ProviderInfo, QuerySynthesizer, SynthError, SynthesizerConfig};
use sheetquery::staging::{Staging, UploadRetention};
use sheetquery::AppContext;
use sqlstore::{ExecMode, Store};

pub const SALES_CSV: &str = "Region,Units Sold\nEast,10\nWest,7\nNorth,12\nSouth,3\nCentral,9\nIslands,1\n";

/// Completion double: always answers with the same text.
pub struct CannedProvider {
    pub reply: String,
    pub credentialed: bool,
    pub seen: Mutex<Vec<CompletionRequest>>,
}

impl CannedProvider {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            credentialed: true,
            seen: Mutex::new(vec![]),
        })
    }

    pub fn without_credential() -> Arc<Self> {
        Arc::new(Self {
            reply: "SELECT 1".to_string(),
            credentialed: false,
            seen: Mutex::new(vec![]),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for CannedProvider {
    async fn complete(&self, request: &CompletionRequest) -> nlsql::Result<String> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "canned".into(),
            base_url: "memory://".into(),
        }
    }

    fn check_credentials(&self) -> nlsql::Result<()> {
        if self.credentialed {
            Ok(())
        } else {
            Err(SynthError::MissingCredential("GROQ_API_KEY".into()))
        }
    }
}

pub async fn context(
    dir: &Path,
    provider: Arc<CannedProvider>,
    retention: UploadRetention,
    exec_mode: ExecMode,
) -> AppContext {
    let store = Store::open(dir.join("database.db")).await.unwrap();
    let synthesizer = QuerySynthesizer::new(provider, SynthesizerConfig::default());
    let staging = Staging::new(dir.join("uploads"), retention);
    AppContext::new(store, synthesizer, staging, exec_mode)
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
