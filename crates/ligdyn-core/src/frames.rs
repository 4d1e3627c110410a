//! Frame extraction.
//!
//! Each requested frame becomes one PDB file holding every non-lipid atom whose
//! molecular fragment comes within the cutoff of the protein, so ligands and
//! bridging waters are written whole.
use crate::conversions::write_pdb;
use crate::error::{Error, Result};
use crate::selection::Selection;
use crate::structure::{load_topology, TrajectorySource};
use crate::trajectory::Trajectory;
use crate::AtomCollection;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Distance from the protein, in Angstrom, that pulls a fragment into a frame.
pub const CONTACT_CUTOFF: f32 = 7.0;

/// An extracted frame file; `index` is absolute (topology models included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub path: PathBuf,
}

impl Frame {
    pub fn file_name(index: usize) -> String {
        format!("frame{index}.pdb")
    }
}

pub struct FrameExtractor<'a> {
    source: &'a TrajectorySource,
    cutoff: f32,
}

impl<'a> FrameExtractor<'a> {
    pub fn new(source: &'a TrajectorySource) -> Self {
        FrameExtractor {
            source,
            cutoff: CONTACT_CUTOFF,
        }
    }

    pub fn with_cutoff(mut self, cutoff: f32) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Writes one filtered PDB per requested frame into `outdir`.
    ///
    /// `frames` are trajectory-relative; only the window `[min, max]` is decoded.
    /// Files come back in the order requested.
    pub fn extract(&self, frames: &[usize], outdir: &Path) -> Result<Vec<Frame>> {
        let (Some(&first), Some(&last)) = (frames.iter().min(), frames.iter().max()) else {
            return Err(Error::NoFrames);
        };
        let available = self.source.frame_count();
        if last >= available {
            return Err(Error::FrameOutOfRange {
                requested: last,
                available,
            });
        }

        let mut topology = load_topology(self.source.topology())?;
        let renamed = topology.atoms.normalize_residue_names();
        log::debug!("normalised {renamed} residue names");

        let mut trajectory = Trajectory::open(self.source.trajectory())?;
        if trajectory.n_atoms() != topology.atoms.get_size() {
            return Err(Error::AtomCountMismatch {
                topology: topology.atoms.get_size(),
                trajectory: trajectory.n_atoms(),
            });
        }
        log::info!(
            "loading frames {first}..={last} of {available} from {}",
            self.source.trajectory().display()
        );
        let window = trajectory.read_window(first, last)?;
        log::debug!("decoded {} trajectory steps", trajectory.steps_read());

        fs::create_dir_all(outdir)?;
        let mut atoms = topology.atoms;
        let mut fragments: Option<Vec<usize>> = None;
        let mut extracted = Vec::with_capacity(frames.len());

        for &frame in frames {
            atoms.set_coords(window[frame - first].clone());
            let fragments = fragments.get_or_insert_with(|| atoms.fragments());
            let selection = select_contact_shell(&atoms, fragments, self.cutoff);

            let index = frame + self.source.topology_frames();
            log::debug!("frame {index}: {} atoms in contact shell", selection.len());
            let path = outdir.join(Frame::file_name(index));
            let writer = BufWriter::new(File::create(&path)?);
            write_pdb(&atoms.view(selection), writer)?;
            extracted.push(Frame { index, path });
        }
        log::info!("extracted {} frames into {}", extracted.len(), outdir.display());
        Ok(extracted)
    }
}

/// `not lipid and same fragment as (within cutoff of protein)`.
pub fn select_contact_shell(atoms: &AtomCollection, fragments: &[usize], cutoff: f32) -> Selection {
    let protein = atoms.select().protein().into_selection();
    let shell = atoms.select().within(cutoff, &protein).into_selection();
    let touched: HashSet<usize> = shell.indices().iter().map(|&i| fragments[i]).collect();
    atoms
        .select()
        .not_lipid()
        .filter(|i| touched.contains(&fragments[i]))
        .into_selection()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::tests::encode_dcd;
    use ligdyn_test_data::TestFile;
    use std::io::Write;

    fn complex_source() -> (TrajectorySource, Vec<tempfile::NamedTempFile>) {
        let (top, top_handle) = TestFile::complex_topology().create_temp().unwrap();
        let (traj, traj_handle) = TestFile::complex_trajectory().create_temp().unwrap();
        let source = TrajectorySource::resolve(Path::new(&top), Path::new(&traj)).unwrap();
        (source, vec![top_handle, traj_handle])
    }

    #[test]
    fn test_contact_shell_selection() {
        let mut atoms = crate::test_utilities::get_atom_container();
        atoms.normalize_residue_names();
        let fragments = atoms.fragments();
        let shell = select_contact_shell(&atoms, &fragments, CONTACT_CUTOFF);
        assert_eq!(shell.len(), 42);

        let names: HashSet<&str> = shell
            .indices()
            .iter()
            .map(|&i| atoms.get_res_name(i).as_str())
            .collect();
        assert!(names.contains("LIG"));
        assert!(names.contains("WAT"));
        assert!(names.contains("NA"));
        assert!(!names.contains("FAR"));
        assert!(!names.contains("OL"));
        // the ligand reaches past the cutoff but stays whole
        assert_eq!(
            shell
                .indices()
                .iter()
                .filter(|&&i| atoms.get_res_name(i) == "LIG")
                .count(),
            6
        );
    }

    #[test]
    fn test_extract_absolute_names() {
        let (source, _handles) = complex_source();
        let outdir = tempfile::tempdir().unwrap();
        let frames = FrameExtractor::new(&source)
            .extract(&[2, 0], outdir.path())
            .unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].index, 3);
        assert_eq!(frames[1].index, 1);
        assert!(frames[0].path.ends_with("frame3.pdb"));
        assert!(frames[1].path.ends_with("frame1.pdb"));

        let text = fs::read_to_string(&frames[0].path).unwrap();
        let atom_lines: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("ATOM") || l.starts_with("HETATM"))
            .collect();
        assert_eq!(atom_lines.len(), 42);
        assert!(text.contains(" WAT "));
        assert!(text.contains(" HIS "));
        assert!(!text.contains("T3P"));
        assert!(!text.contains("HIE"));
        // frame 2 is shifted by 0.2 along z
        assert_eq!(atom_lines[0][46..54].trim(), "0.200");
        assert_eq!(fs::read_dir(outdir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_extract_out_of_range() {
        let (source, _handles) = complex_source();
        let outdir = tempfile::tempdir().unwrap();
        let err = FrameExtractor::new(&source)
            .extract(&[1, 4], outdir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FrameOutOfRange {
                requested: 4,
                available: 4
            }
        ));
        assert!(matches!(
            FrameExtractor::new(&source).extract(&[], outdir.path()),
            Err(Error::NoFrames)
        ));
    }

    #[test]
    fn test_extract_from_dcd() {
        let (top, _top_handle) = TestFile::complex_topology().create_temp().unwrap();
        let atoms = crate::test_utilities::get_atom_container();
        let frames: Vec<_> = (0..3)
            .map(|k| {
                atoms
                    .get_coords()
                    .iter()
                    .map(|p| [p[0], p[1], p[2] + k as f32])
                    .collect()
            })
            .collect();
        let mut dcd = tempfile::Builder::new().suffix(".dcd").tempfile().unwrap();
        dcd.write_all(&encode_dcd(&frames, true, false)).unwrap();
        dcd.flush().unwrap();

        let source = TrajectorySource::resolve(Path::new(&top), dcd.path()).unwrap();
        assert_eq!(source.frame_count(), 3);
        let outdir = tempfile::tempdir().unwrap();
        let extracted = FrameExtractor::new(&source)
            .extract(&[1], outdir.path())
            .unwrap();
        assert_eq!(extracted[0].index, 2);
        let text = fs::read_to_string(&extracted[0].path).unwrap();
        let first_atom = text.lines().next().unwrap();
        assert_eq!(first_atom[46..54].trim(), "1.000");
    }
}
