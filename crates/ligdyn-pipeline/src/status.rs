use crate::detector::progress;
use crate::tasks::TaskState;
use std::path::Path;
use strum::Display;

/// Job status as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum JobStatus {
    /// Never submitted.
    Queueing,
    /// Submitted, no reports written yet.
    Queued,
    #[strum(to_string = "Running {done} / {total} frames")]
    Running { done: usize, total: usize },
    Finished,
    Failure,
}

/// Derives the status from the task state and the reports written so far.
pub fn job_status(state: Option<&TaskState>, reports_dir: &Path, total_frames: usize) -> JobStatus {
    match state {
        None => JobStatus::Queueing,
        Some(TaskState::Done) => JobStatus::Finished,
        Some(TaskState::Failed(_)) => JobStatus::Failure,
        Some(TaskState::Pending) => match progress(reports_dir) {
            0 => JobStatus::Queued,
            done => JobStatus::Running {
                done,
                total: total_frames,
            },
        },
    }
}
