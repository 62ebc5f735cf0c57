use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("unsupported file format: {0:?} (accepted: csv, xlsx, xls)")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("malformed sheet: {0}")]
    Malformed(String),

    #[error("duplicate column after normalization: {0}")]
    DuplicateColumn(String),
}

pub type Result<T> = std::result::Result<T, TabularError>;
