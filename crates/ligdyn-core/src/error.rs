use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading structures and extracting frames.
///
/// All of these are input errors: they abort the analysis run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to read structure {path}: {details}")]
    Structure { path: PathBuf, details: String },

    #[error("failed to parse trajectory {path}: {details}")]
    Trajectory { path: PathBuf, details: String },

    #[error("unsupported file format '{0}'")]
    UnsupportedFormat(String),

    #[error("trajectory has {trajectory} atoms but the topology has {topology}")]
    AtomCountMismatch { topology: usize, trajectory: usize },

    #[error("frame {requested} requested but the trajectory has only {available} frames")]
    FrameOutOfRange { requested: usize, available: usize },

    #[error("no frames requested")]
    NoFrames,

    #[error("no topology/trajectory pair found in {0}")]
    NoTrajectoryFiles(PathBuf),
}

impl Error {
    pub fn trajectory(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::Trajectory {
            path: path.into(),
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
