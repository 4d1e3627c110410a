use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to run {program}: {details}")]
    Search { program: String, details: String },

    #[error("malformed search report: {0}")]
    Report(#[from] roxmltree::Error),

    #[error("search report field <{field}> has invalid value '{value}'")]
    ReportValue { field: String, value: String },

    #[error("residue metadata request for {entry} failed: {details}")]
    Metadata { entry: String, details: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache entry {path} could not be written: {source}")]
    Cache {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
