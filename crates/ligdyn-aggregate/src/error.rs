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
    Results(#[from] ligdyn_io::Error),

    #[error("table error: {0}")]
    Table(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("simulation {0} is not listed in the experimental data")]
    UnknownSimulation(String),

    #[error("no simulations to aggregate")]
    NoSimulations,
}

pub type Result<T> = std::result::Result<T, Error>;
