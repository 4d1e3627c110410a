//! Running the contact analysis of whole simulations.
//!
//! A [`Pipeline`] turns one topology/trajectory pair into result tables:
//! frames are extracted, PLIP runs over them in parallel shards, the reports
//! are parsed and every protein chain is mapped to reference numbering. Runs can
//! be queued on a [`TaskQueue`] and observed through [`JobStatus`].
mod config;
pub mod detector;
mod discover;
mod error;
mod pipeline;
mod status;
mod tasks;

pub use config::PipelineConfig;
pub use detector::Detector;
pub use discover::discover_source;
pub use error::{Error, Result};
pub use pipeline::{results_dir, Pipeline, RunRequest, FRAMES_DIR, REPORTS_DIR};
pub use status::{job_status, JobStatus};
pub use tasks::{LocalTaskQueue, TaskId, TaskQueue, TaskState, Work};
