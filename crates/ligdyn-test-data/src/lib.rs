//! ligdyn-test-data
//!
//! A module to provide test files embedded in the crate for use in testing.
//! The fixtures are small, hand-built inputs for every stage of the contact pipeline:
//! a protein/ligand complex with water, an ion and a lipid, a trajectory of it,
//! PLIP reports, BLAST output, GPCRdb residue records and compound lookup tables.
//!
//! The test files are represented as `TestFile` objects which package the raw binary data
//! and create temporary files for programs to operate on.
use std::fs;
use std::io;
use std::path::Path;
use tempfile::{Builder, NamedTempFile, TempDir};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use ligdyn_test_data::TestFile;
/// let (top_file, _temp) = TestFile::complex_topology().create_temp().unwrap();
/// let (traj_file, _temp) = TestFile::complex_trajectory().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Chain A: MET1 SER2 HIE3 LEU4 ASP5 GLY6 (32 atoms, one linear fragment).
    /// Chain L: ligand LIG101 (partly beyond 7 Å), FAR102 (distant), NA103 ion.
    /// Chain W: two T3P waters, one near and one far. Chain M: lipid tail OL301.
    pub fn complex_topology() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/complex.pdb"),
            suffix: "pdb",
        }
    }
    /// Four models of `complex_topology`; model k is shifted by 0.1 * k Å along z.
    pub fn complex_trajectory() -> Self {
        Self {
            filebinary: include_bytes!("../data/trajectories/complex_traj.pdb"),
            suffix: "pdb",
        }
    }
    /// Two models of a single three-atom water.
    pub fn short_trajectory() -> Self {
        Self {
            filebinary: include_bytes!("../data/trajectories/short.pdb"),
            suffix: "pdb",
        }
    }
    /// A report holding an interaction category PLIP never writes.
    pub fn report_unknown_type() -> Self {
        Self {
            filebinary: include_bytes!("../data/reports/frame7_unknown.xml"),
            suffix: "xml",
        }
    }
    /// `blastp -outfmt 5` output: one ungapped hit of MSHLDG onto residues 11-16
    /// of `P99999|test_human`.
    pub fn blast_hit() -> Self {
        Self {
            filebinary: include_bytes!("../data/blast/blast_hit.xml"),
            suffix: "xml",
        }
    }
    pub fn blast_no_hits() -> Self {
        Self {
            filebinary: include_bytes!("../data/blast/blast_no_hits.xml"),
            suffix: "xml",
        }
    }
    /// GPCRdb `residues/extended/test_human` response, 20 residues.
    pub fn gpcrdb_residues() -> Self {
        Self {
            filebinary: include_bytes!("../data/metadata/test_human_residues.json"),
            suffix: "json",
        }
    }
    pub fn inchikey_to_name() -> Self {
        Self {
            filebinary: include_bytes!("../data/lookup/inchikey_to_name.json"),
            suffix: "json",
        }
    }
    pub fn inchikey_to_chebi_id() -> Self {
        Self {
            filebinary: include_bytes!("../data/lookup/inchikey_to_chebiID.json"),
            suffix: "json",
        }
    }
    /// Covariate table for simulations `sim_a`, `sim_b` and `sim_c` (column `pKi`).
    pub fn exp_data() -> Self {
        Self {
            filebinary: include_bytes!("../data/group/exp_data.csv"),
            suffix: "csv",
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.filebinary
    }

    pub fn create_temp(&self) -> io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }

    /// Writes the fixture to `dir/name`.
    pub fn write_to(&self, dir: &Path, name: &str) -> io::Result<()> {
        fs::write(dir.join(name), self.filebinary)
    }
}

/// PLIP output for four frames of `complex_topology`, as PLIP lays it out:
/// one `frame{N}/report.xml` per frame.
///
/// | frame | binding sites                                   | contacts |
/// |-------|-------------------------------------------------|----------|
/// | 1     | LIG (LEU4, MET1 hydrophobic; SER2 H-bond), NA without interactions | 3 |
/// | 2     | LIG (LEU4 hydrophobic; ASP5 salt bridge)        | 2        |
/// | 3     | LIG twice (HIS3 pi stacking; SER2 water bridge) | 2        |
/// | 10    | FAR (LEU4 hydrophobic), LIG without interactions | 1       |
pub struct TestReports;

impl TestReports {
    pub const FRAMES: [(usize, &'static [u8]); 4] = [
        (1, include_bytes!("../data/reports/frame1.xml")),
        (2, include_bytes!("../data/reports/frame2.xml")),
        (3, include_bytes!("../data/reports/frame3.xml")),
        (10, include_bytes!("../data/reports/frame10.xml")),
    ];

    /// Writes every report into `dir/frame{N}/report.xml`.
    pub fn write_to(dir: &Path) -> io::Result<()> {
        for (frame, report) in Self::FRAMES {
            let report_dir = dir.join(format!("frame{frame}"));
            fs::create_dir_all(&report_dir)?;
            fs::write(report_dir.join("report.xml"), report)?;
        }
        Ok(())
    }

    pub fn create_temp_dir() -> io::Result<TempDir> {
        let dir = Builder::new().prefix("plip").tempdir()?;
        Self::write_to(dir.path())?;
        Ok(dir)
    }
}
