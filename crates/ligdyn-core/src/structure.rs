use crate::error::{Error, Result};
use crate::trajectory::Trajectory;
use crate::AtomCollection;
use pdbtbx::{ReadOptions, StrictnessLevel};
use std::path::{Path, PathBuf};

/// A topology read from disk, with the number of models it already contains.
pub struct Topology {
    pub atoms: AtomCollection,
    pub model_count: usize,
}

/// Reads a PDB or mmCIF topology through pdbtbx.
///
/// Only the first model provides atoms; the remaining models are counted so
/// frame indices can be made absolute.
pub fn load_topology(path: &Path) -> Result<Topology> {
    let structure_error = |details: String| Error::Structure {
        path: path.to_path_buf(),
        details,
    };
    let path_str = path
        .to_str()
        .ok_or_else(|| structure_error("path is not valid UTF-8".to_string()))?;
    let (pdb, warnings) = ReadOptions::default()
        .set_level(StrictnessLevel::Loose)
        .read(path_str)
        .map_err(|errors| {
            structure_error(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;
    if !warnings.is_empty() {
        log::debug!("{}: {} parser warnings", path.display(), warnings.len());
    }

    let atoms = AtomCollection::from(&pdb);
    if atoms.get_size() == 0 {
        return Err(structure_error("no atoms".to_string()));
    }
    Ok(Topology {
        atoms,
        model_count: pdb.model_count().max(1),
    })
}

/// A resolved topology/trajectory pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectorySource {
    topology: PathBuf,
    trajectory: PathBuf,
    frame_count: usize,
    topology_frames: usize,
}

impl TrajectorySource {
    /// Opens both files once to validate atom counts and count frames.
    pub fn resolve(topology: &Path, trajectory: &Path) -> Result<Self> {
        let top = load_topology(topology)?;
        let traj = Trajectory::open(trajectory)?;
        if traj.n_atoms() != top.atoms.get_size() {
            return Err(Error::AtomCountMismatch {
                topology: top.atoms.get_size(),
                trajectory: traj.n_atoms(),
            });
        }
        Ok(TrajectorySource {
            topology: topology.to_path_buf(),
            trajectory: trajectory.to_path_buf(),
            frame_count: traj.n_frames(),
            topology_frames: top.model_count,
        })
    }

    /// Rebuilds a source from a previously computed frame count.
    pub fn with_frame_count(
        topology: PathBuf,
        trajectory: PathBuf,
        frame_count: usize,
        topology_frames: usize,
    ) -> Self {
        TrajectorySource {
            topology,
            trajectory,
            frame_count,
            topology_frames,
        }
    }

    pub fn topology(&self) -> &Path {
        &self.topology
    }
    pub fn trajectory(&self) -> &Path {
        &self.trajectory
    }
    /// Trajectory frames, not counting the topology's own models.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
    pub fn topology_frames(&self) -> usize {
        self.topology_frames
    }
}

pub fn frame_count(topology: &Path, trajectory: &Path) -> Result<usize> {
    Ok(TrajectorySource::resolve(topology, trajectory)?.frame_count())
}
