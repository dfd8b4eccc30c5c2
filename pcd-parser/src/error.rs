use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid scene file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("line {line}: cannot parse '{value}' as {field}")]
    InvalidValue {
        field: &'static str,
        value: String,
        line: u64,
    },
    #[error("unsupported extension: {0}")]
    UnsupportedExtension(String),
}
