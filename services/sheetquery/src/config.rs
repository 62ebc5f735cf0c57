use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::preload::{parse_preload, PreloadEntry};
use crate::staging::UploadRetention;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub upload_folder: PathBuf,
    pub upload_retention: UploadRetention,
    pub max_upload_bytes: usize,

    pub groq_api_key: Option<String>,
    pub completion_base_url: String,
    pub completion_model: String,
    pub completion_temperature: f32,
    pub completion_timeout: Duration,

    pub default_limit: u32,
    pub include_schema: bool,
    pub fixed_table: Option<String>,
    pub sql_read_only: bool,

    pub preload: Vec<PreloadEntry>,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key -> value source. Unset and empty values are treated alike.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let completion_base_url = var("COMPLETION_BASE_URL")
            .unwrap_or_else(|| nlsql::provider_groq::DEFAULT_BASE_URL.to_string());

        let upload_retention = match var("UPLOAD_RETENTION") {
            Some(v) => v.parse()?,
            None => UploadRetention::Keep,
        };

        let bind_addr = match (var("BIND_ADDR"), var("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => format!("0.0.0.0:{}", parse::<u16>("PORT", &port)?),
            (None, None) => "0.0.0.0:5000".to_string(),
        };

        let cfg = Self {
            database_path: PathBuf::from(var("DATABASE_PATH").unwrap_or_else(|| "database.db".to_string())),
            upload_folder: PathBuf::from(var("UPLOAD_FOLDER").unwrap_or_else(|| "uploads".to_string())),
            upload_retention,
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,

            groq_api_key: var("GROQ_API_KEY"),
            completion_base_url,
            completion_model: var("COMPLETION_MODEL").unwrap_or_else(|| nlsql::DEFAULT_MODEL.to_string()),
            completion_temperature: parse_or(&var, "COMPLETION_TEMPERATURE", nlsql::DEFAULT_TEMPERATURE)?,
            completion_timeout: Duration::from_secs(parse_or(&var, "COMPLETION_TIMEOUT_SECS", 60u64)?),

            default_limit: parse_or(&var, "DEFAULT_LIMIT", nlsql::DEFAULT_ROW_LIMIT)?,
            include_schema: var("NLQ_INCLUDE_SCHEMA").map(|v| flag(&v)).unwrap_or(true),
            fixed_table: var("NLQ_FIXED_TABLE"),
            sql_read_only: var("SQL_READ_ONLY").map(|v| flag(&v)).unwrap_or(false),

            preload: var("PRELOAD_DATA").map(|v| parse_preload(&v)).unwrap_or_default(),
            bind_addr,
        };

        // reject obviously broken values at startup
        if !cfg.completion_base_url.starts_with("http://") && !cfg.completion_base_url.starts_with("https://") {
            bail!("COMPLETION_BASE_URL must start with http:// or https://");
        }
        if !(0.0..=2.0).contains(&cfg.completion_temperature) {
            bail!("COMPLETION_TEMPERATURE must be between 0 and 2");
        }

        Ok(cfg)
    }
}

fn flag(v: &str) -> bool {
    matches!(v.trim(), "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON")
}

fn parse<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Invalid value for env var {key}: {raw:?}"))
}

fn parse_or<T>(var: &dyn Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = cfg(&[]).unwrap();
        assert_eq!(c.database_path, PathBuf::from("database.db"));
        assert_eq!(c.upload_folder, PathBuf::from("uploads"));
        assert_eq!(c.upload_retention, UploadRetention::Keep);
        assert_eq!(c.default_limit, 200);
        assert_eq!(c.completion_model, "llama-3.1-8b-instant");
        assert!(c.groq_api_key.is_none());
        assert!(c.include_schema);
        assert!(!c.sql_read_only);
        assert_eq!(c.bind_addr, "0.0.0.0:5000");
        assert!(c.preload.is_empty());
    }

    #[test]
    fn test_overrides() {
        let c = cfg(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("DEFAULT_LIMIT", "50"),
            ("SQL_READ_ONLY", "true"),
            ("UPLOAD_RETENTION", "discard"),
            ("NLQ_FIXED_TABLE", "sales"),
            ("NLQ_INCLUDE_SCHEMA", "no"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(c.groq_api_key.as_deref(), Some("gsk_test"));
        assert_eq!(c.default_limit, 50);
        assert!(c.sql_read_only);
        assert_eq!(c.upload_retention, UploadRetention::Discard);
        assert_eq!(c.fixed_table.as_deref(), Some("sales"));
        assert!(!c.include_schema);
        assert_eq!(c.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_blank_key_is_unset() {
        let c = cfg(&[("GROQ_API_KEY", "   ")]).unwrap();
        assert!(c.groq_api_key.is_none());
    }

    #[test]
    fn test_bad_values_fail() {
        assert!(cfg(&[("DEFAULT_LIMIT", "lots")]).is_err());
        assert!(cfg(&[("COMPLETION_BASE_URL", "api.groq.com")]).is_err());
        assert!(cfg(&[("UPLOAD_RETENTION", "sometimes")]).is_err());
    }
}
