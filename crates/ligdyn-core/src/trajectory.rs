//! Trajectory reading through chemfiles.
//!
//! Multi-model PDB and DCD files are supported. The frame count comes from
//! chemfiles' step index, so coordinates are decoded only for the steps a
//! caller asks for.
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub type Coordinates = Vec<[f32; 3]>;

const EXTENSIONS: [&str; 3] = ["pdb", "ent", "dcd"];

pub struct Trajectory {
    path: PathBuf,
    inner: chemfiles::Trajectory,
    n_atoms: usize,
    n_frames: usize,
    steps_read: usize,
}

impl Trajectory {
    /// Opens a trajectory; the format follows the file extension.
    pub fn open(path: &Path) -> Result<Self> {
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if !supported {
            return Err(Error::UnsupportedFormat(path.display().to_string()));
        }
        let mut inner =
            chemfiles::Trajectory::open(path, 'r').map_err(|e| Error::trajectory(path, e.to_string()))?;
        let n_frames = inner.nsteps();
        if n_frames == 0 {
            return Err(Error::trajectory(path, "no frames"));
        }
        let mut first = chemfiles::Frame::new();
        inner
            .read_step(0, &mut first)
            .map_err(|e| Error::trajectory(path, e.to_string()))?;
        log::debug!("{}: {} frames of {} atoms", path.display(), n_frames, first.size());

        Ok(Trajectory {
            path: path.to_path_buf(),
            inner,
            n_atoms: first.size(),
            n_frames,
            steps_read: 0,
        })
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Steps decoded by [`Trajectory::read_window`] so far.
    pub fn steps_read(&self) -> usize {
        self.steps_read
    }

    /// Decodes frames `first..=last`, in order.
    pub fn read_window(&mut self, first: usize, last: usize) -> Result<Vec<Coordinates>> {
        if first > last {
            return Err(Error::NoFrames);
        }
        if last >= self.n_frames {
            return Err(Error::FrameOutOfRange {
                requested: last,
                available: self.n_frames,
            });
        }
        let mut frame = chemfiles::Frame::new();
        let mut window = Vec::with_capacity(last - first + 1);
        for step in first..=last {
            self.inner
                .read_step(step, &mut frame)
                .map_err(|e| Error::trajectory(&self.path, e.to_string()))?;
            if frame.size() != self.n_atoms {
                return Err(Error::trajectory(
                    &self.path,
                    format!("frame {step} has {} atoms, expected {}", frame.size(), self.n_atoms),
                ));
            }
            window.push(
                frame
                    .positions()
                    .iter()
                    .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
                    .collect(),
            );
            self.steps_read += 1;
        }
        Ok(window)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ligdyn_test_data::TestFile;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(out: &mut Vec<u8>, payload: &[u8], big_endian: bool) {
        let marker = payload.len() as u32;
        let marker = if big_endian {
            marker.to_be_bytes()
        } else {
            marker.to_le_bytes()
        };
        out.extend_from_slice(&marker);
        out.extend_from_slice(payload);
        out.extend_from_slice(&marker);
    }

    /// Serialises `frames` as a CHARMM-flavoured DCD.
    pub(crate) fn encode_dcd(frames: &[Coordinates], unit_cell: bool, big_endian: bool) -> Vec<u8> {
        let int = |v: i32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        let float = |v: f32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        let double = |v: f64| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        let n_atoms = frames.first().map(|f| f.len()).unwrap_or(0);

        let mut out = Vec::new();
        let mut control = b"CORD".to_vec();
        let mut icntrl = [0i32; 20];
        icntrl[0] = frames.len() as i32;
        icntrl[1] = 1;
        icntrl[2] = 1;
        icntrl[3] = frames.len() as i32;
        icntrl[10] = unit_cell as i32;
        icntrl[19] = 24;
        for word in icntrl {
            control.extend_from_slice(&int(word));
        }
        record(&mut out, &control, big_endian);

        let mut titles = int(1).to_vec();
        titles.extend_from_slice(&[b' '; 80]);
        record(&mut out, &titles, big_endian);
        record(&mut out, &int(n_atoms as i32), big_endian);

        for frame in frames {
            if unit_cell {
                let cell: Vec<u8> = [50.0f64, 90.0, 50.0, 90.0, 90.0, 50.0]
                    .iter()
                    .flat_map(|&v| double(v))
                    .collect();
                record(&mut out, &cell, big_endian);
            }
            for axis in 0..3 {
                let payload: Vec<u8> = frame.iter().flat_map(|pos| float(pos[axis])).collect();
                record(&mut out, &payload, big_endian);
            }
        }
        out
    }

    fn sample_frames(n_frames: usize, n_atoms: usize) -> Vec<Coordinates> {
        (0..n_frames)
            .map(|f| {
                (0..n_atoms)
                    .map(|a| [a as f32, f as f32, (a * f) as f32 * 0.5])
                    .collect()
            })
            .collect()
    }

    fn write_dcd(bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".dcd").tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_pdb_frame_count_and_window() {
        let (traj_file, _temp) = TestFile::complex_trajectory().create_temp().unwrap();
        let mut traj = Trajectory::open(Path::new(&traj_file)).unwrap();
        assert_eq!(traj.n_frames(), 4);
        assert_eq!(traj.n_atoms(), 56);

        let window = traj.read_window(1, 2).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(traj.steps_read(), 2);
        assert_eq!(window[0].len(), 56);
        // frame k is the topology shifted by 0.1 * k along z
        let z0 = window[0][0][2];
        assert!((window[1][0][2] - z0 - 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_single_model_pdb() {
        let (top_file, _temp) = TestFile::complex_topology().create_temp().unwrap();
        let mut traj = Trajectory::open(Path::new(&top_file)).unwrap();
        assert_eq!(traj.n_frames(), 1);
        assert_eq!(traj.read_window(0, 0).unwrap()[0].len(), 56);
    }

    #[test]
    fn test_dcd_window_with_unit_cell() {
        let frames = sample_frames(5, 7);
        let file = write_dcd(&encode_dcd(&frames, true, false));
        let mut traj = Trajectory::open(file.path()).unwrap();
        assert_eq!(traj.n_atoms(), 7);
        assert_eq!(traj.n_frames(), 5);

        let window = traj.read_window(2, 3).unwrap();
        assert_eq!(window, frames[2..=3].to_vec());
        assert_eq!(traj.steps_read(), 2);
    }

    #[test]
    fn test_dcd_big_endian() {
        let frames = sample_frames(3, 4);
        let file = write_dcd(&encode_dcd(&frames, false, true));
        let mut traj = Trajectory::open(file.path()).unwrap();
        assert_eq!(traj.n_frames(), 3);
        assert_eq!(traj.read_window(0, 2).unwrap(), frames);
    }

    #[test]
    fn test_window_out_of_range() {
        let frames = sample_frames(2, 3);
        let file = write_dcd(&encode_dcd(&frames, false, false));
        let mut traj = Trajectory::open(file.path()).unwrap();
        assert!(matches!(
            traj.read_window(0, 2),
            Err(Error::FrameOutOfRange {
                requested: 2,
                available: 2
            })
        ));
        assert!(matches!(traj.read_window(1, 0), Err(Error::NoFrames)));
        assert_eq!(traj.steps_read(), 0);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            Trajectory::open(Path::new("run.xyz")),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
