use anyhow::{bail, Context};
use ligdyn_pipeline::{Detector, PipelineConfig};
use std::fs;
use std::path::PathBuf;

pub fn execute(frames_dir: PathBuf, outdir: PathBuf, config: PipelineConfig) -> anyhow::Result<()> {
    let mut files: Vec<PathBuf> = fs::read_dir(&frames_dir)
        .with_context(|| format!("reading {}", frames_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "pdb"))
        .collect();
    files.sort();
    if files.is_empty() {
        bail!("no frame files in {}", frames_dir.display());
    }

    let detector = Detector::new(config.detector_command, config.workers)?;
    detector.run(&files, &outdir)?;
    println!(
        "{} reports in {}",
        ligdyn_pipeline::detector::progress(&outdir),
        outdir.display()
    );
    Ok(())
}
