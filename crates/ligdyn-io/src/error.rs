use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading reports and reading or writing result tables.
///
/// Every variant here is fatal for the run: a report that does not match the
/// expected schema is a contract violation, not a data artifact.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("malformed XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        source: roxmltree::Error,
    },

    #[error("{path}: missing <{field}>")]
    MissingField { path: PathBuf, field: String },

    #[error("{path}: invalid value '{value}' for <{field}>")]
    InvalidValue {
        path: PathBuf,
        field: String,
        value: String,
    },

    #[error("{path}: unknown interaction type '{key}'")]
    UnknownInteractionType { path: PathBuf, key: String },

    #[error("report directory {0} has no frame number suffix")]
    InvalidFrameDir(PathBuf),

    #[error("table error: {0}")]
    Table(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
