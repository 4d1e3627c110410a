//! Finding the topology and trajectory inside an upload directory.
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

const TOPOLOGY_EXTENSIONS: [&str; 3] = ["pdb", "cif", "mmcif"];
const TRAJECTORY_EXTENSIONS: [&str; 1] = ["dcd"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// `(topology, trajectory)` from `dir`, in file-name order.
///
/// The topology is the first PDB/mmCIF file. The trajectory is the first DCD
/// file, or failing that, the next PDB file after the topology.
pub fn discover_source(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let not_found = || ligdyn_core::Error::NoTrajectoryFiles(dir.to_path_buf());
    let topology = files
        .iter()
        .find(|p| has_extension(p, &TOPOLOGY_EXTENSIONS))
        .cloned()
        .ok_or_else(not_found)?;
    let trajectory = files
        .iter()
        .find(|p| has_extension(p, &TRAJECTORY_EXTENSIONS))
        .or_else(|| {
            files
                .iter()
                .find(|p| **p != topology && has_extension(p, &["pdb"]))
        })
        .cloned()
        .ok_or_else(not_found)?;

    log::info!(
        "found topology {} and trajectory {}",
        topology.display(),
        trajectory.display()
    );
    Ok((topology, trajectory))
}
