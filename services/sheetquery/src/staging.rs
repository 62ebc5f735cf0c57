use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};
use uuid::Uuid;

/// What happens to a staged upload once ingestion is done with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadRetention {
    /// Leave staged files in the upload folder.
    #[default]
    Keep,
    /// Delete the staged file after the ingestion attempt, success or not.
    Discard,
}

impl FromStr for UploadRetention {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(UploadRetention::Keep),
            "discard" | "delete" => Ok(UploadRetention::Discard),
            other => anyhow::bail!("UPLOAD_RETENTION must be keep or discard, got {other:?}"),
        }
    }
}

/// Upload staging directory.
#[derive(Clone, Debug)]
pub struct Staging {
    dir: PathBuf,
    retention: UploadRetention,
}

impl Staging {
    pub fn new(dir: impl Into<PathBuf>, retention: UploadRetention) -> Self {
        Self {
            dir: dir.into(),
            retention,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn retention(&self) -> UploadRetention {
        self.retention
    }

    /// Write the raw upload to `<dir>/<uuid>_<basename>`.
    pub async fn stage(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{}_{}", Uuid::new_v4(), safe_basename(filename)));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "upload staged");
        Ok(path)
    }

    /// Apply the retention policy to a staged file.
    pub async fn release(&self, path: &Path) {
        if self.retention == UploadRetention::Keep {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "failed to discard staged upload");
        }
    }
}

/// Final path component with anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn safe_basename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}
