use super::resolve_source;
use crate::cli::SourceArgs;
use anyhow::{anyhow, bail, Context};
use ligdyn_io::summary::RUN_SUMMARY_JSON;
use ligdyn_io::RunSummary;
use ligdyn_pipeline::{
    job_status, JobStatus, LocalTaskQueue, Pipeline, PipelineConfig, RunRequest, TaskQueue, TaskState, REPORTS_DIR,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub fn execute(
    source: &SourceArgs,
    name: Option<String>,
    frames: Vec<usize>,
    results_dir: PathBuf,
    config: PipelineConfig,
) -> anyhow::Result<()> {
    let source = resolve_source(source)?;
    let name = match name {
        Some(name) => name,
        None => results_dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| anyhow!("cannot name a run after {}", results_dir.display()))?,
    };
    let request = RunRequest {
        name,
        source,
        frames: (!frames.is_empty()).then_some(frames),
        results_dir,
    };
    let total = request.frames().len();
    let reports_dir = request.reports_dir();
    let summary_path = request.results_dir.join(RUN_SUMMARY_JSON);

    let pipeline = Arc::new(Pipeline::from_config(config)?);
    let queue = LocalTaskQueue::new();
    let id = pipeline.submit(&queue, request);

    let mut shown = None;
    let state = loop {
        let state = queue.poll(id);
        let status = job_status(state.as_ref(), &reports_dir, total);
        if shown.as_ref() != Some(&status) {
            log::info!("{status}");
            shown = Some(status);
        }
        match state {
            Some(TaskState::Pending) => thread::sleep(POLL_INTERVAL),
            _ => break queue.wait(id),
        }
    };
    match state {
        Some(TaskState::Done) => {
            println!("{}", summary_path.display());
            Ok(())
        }
        Some(TaskState::Failed(reason)) => bail!("analysis failed: {reason}"),
        _ => bail!("task {id} disappeared from the queue"),
    }
}

/// Status of a results directory as left behind by `run`.
pub fn status(results_dir: PathBuf, frame_count: usize) -> anyhow::Result<()> {
    let reports_dir = results_dir.join(REPORTS_DIR);
    let state = if results_dir.join(RUN_SUMMARY_JSON).is_file() {
        Some(TaskState::Done)
    } else if reports_dir.is_dir() {
        Some(TaskState::Pending)
    } else {
        None
    };
    let status: JobStatus = job_status(state.as_ref(), &reports_dir, frame_count);
    println!("{status}");
    if let Some(TaskState::Done) = state {
        let summary = RunSummary::load(&results_dir.join(RUN_SUMMARY_JSON))
            .with_context(|| format!("reading the summary in {}", results_dir.display()))?;
        println!(
            "{} frames, {} ligands, created {}",
            summary.frame_count,
            summary.ligands.len(),
            summary.created.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}
