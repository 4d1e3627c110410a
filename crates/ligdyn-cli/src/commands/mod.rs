pub mod detect;
pub mod frames;
pub mod group;
pub mod parse;
pub mod run;
pub mod translate;

use crate::cli::SourceArgs;
use anyhow::{bail, Context};
use ligdyn_core::TrajectorySource;
use ligdyn_pipeline::discover_source;

/// Resolves `--input` or the explicit `--topology`/`--trajectory` pair.
pub fn resolve_source(args: &SourceArgs) -> anyhow::Result<TrajectorySource> {
    let (topology, trajectory) = match (&args.input, &args.topology, &args.trajectory) {
        (Some(dir), _, _) => discover_source(dir)?,
        (None, Some(top), Some(traj)) => (top.clone(), traj.clone()),
        _ => bail!("either --input or both --topology and --trajectory are required"),
    };
    TrajectorySource::resolve(&topology, &trajectory)
        .with_context(|| format!("opening {} with {}", trajectory.display(), topology.display()))
}
