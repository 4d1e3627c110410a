use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    Structure(#[from] ligdyn_core::Error),

    #[error(transparent)]
    Report(#[from] ligdyn_io::Error),

    #[error(transparent)]
    Align(#[from] ligdyn_align::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read configuration {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("detector worker {shard} failed: {details}")]
    Worker { shard: usize, details: String },
}

pub type Result<T> = std::result::Result<T, Error>;
