use super::resolve_source;
use crate::cli::SourceArgs;
use ligdyn_core::FrameExtractor;
use ligdyn_pipeline::PipelineConfig;
use std::path::PathBuf;

pub fn count(source: &SourceArgs) -> anyhow::Result<()> {
    let source = resolve_source(source)?;
    println!("{}", source.frame_count());
    Ok(())
}

pub fn execute(
    source: &SourceArgs,
    frames: Vec<usize>,
    outdir: PathBuf,
    config: PipelineConfig,
) -> anyhow::Result<()> {
    let source = resolve_source(source)?;
    let frames = if frames.is_empty() {
        (0..source.frame_count()).collect()
    } else {
        frames
    };
    let extracted = FrameExtractor::new(&source)
        .with_cutoff(config.cutoff)
        .extract(&frames, &outdir)?;
    for frame in extracted {
        println!("{}", frame.path.display());
    }
    Ok(())
}
