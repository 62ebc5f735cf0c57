use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Result, SynthError};

// body of the first fenced block, up to the closing fence (or end of text
// when the model never closed it)
static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)(?:```|\z)").unwrap());

// only known dialect names count as a language tag; `SELECT` on the fence
// line is part of the statement
static LANG_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[ \t]*(?:sqlite3?|sql|postgres(?:ql)?|psql|mysql|tsql|plsql|duckdb|text)(?:[ \t]*\r?\n|[ \t]+|$)",
    )
    .unwrap()
});

/// Pull the SQL statement out of a raw completion.
///
/// Fenced output yields the body of the first fenced block, without fence
/// markers or language tag. Anything else is taken as-is. The statement is
/// not otherwise inspected.
pub fn extract_sql(completion: &str) -> Result<String> {
    let text = completion.trim();

    let statement = match FENCE.captures(text) {
        Some(caps) => {
            let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            LANG_TAG.replace(body, "").trim().to_string()
        }
        None => text.to_string(),
    };

    if statement.is_empty() {
        return Err(SynthError::Malformed(
            "completion contained no SQL statement".to_string(),
        ));
    }
    Ok(statement)
}
