use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static NON_WORD_OR_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").unwrap());

/// Canonical column identifier:
/// - lowercase
/// - drop every char that is neither a word char nor whitespace
/// - collapse whitespace runs into a single `_`
///
/// Idempotent: the output only contains word chars.
pub fn normalize_column_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped = NON_WORD_OR_SPACE.replace_all(&lowered, "");
    WHITESPACE_RUN.replace_all(&stripped, "_").into_owned()
}

/// Dataset (table) name from an uploaded filename: the stem, lowercased, with
/// every non-word char replaced by `_`.
///
/// Only the final path component is looked at, so `../x/Sales Q1.csv` gives
/// `sales_q1`.
pub fn dataset_name_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    normalize_dataset_name(stem)
}

/// Lowercase, then every non-word char becomes `_`. Used as is for explicit
/// name hints.
pub fn normalize_dataset_name(raw: &str) -> String {
    NON_WORD.replace_all(&raw.to_lowercase(), "_").into_owned()
}

/// Lowercased extension of `filename`, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
