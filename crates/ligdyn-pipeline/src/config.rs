use crate::error::{Error, Result};
use ligdyn_align::GPCRDB_RESIDUES_ENDPOINT;
use ligdyn_core::CONTACT_CUTOFF;
use ligdyn_io::LIGAND_DETECTION_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings shared by every run; loaded from JSON, missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Detector processes run side by side.
    pub workers: usize,
    /// Program and leading arguments; frame files are appended.
    pub detector_command: Vec<String>,
    pub blastp: PathBuf,
    pub blast_db: PathBuf,
    pub metadata_endpoint: String,
    /// Residue metadata cache; `None` keeps it in memory for the process.
    pub cache_dir: Option<PathBuf>,
    /// InChIKey to compound name table.
    pub compound_names: Option<PathBuf>,
    /// InChIKey to ChEBI id table.
    pub compound_ids: Option<PathBuf>,
    pub ligand_threshold: f64,
    pub cutoff: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            workers: 4,
            detector_command: ["plip", "-v", "-x", "-f"].map(String::from).to_vec(),
            blastp: PathBuf::from("blastp"),
            blast_db: PathBuf::from("blast/blast_db"),
            metadata_endpoint: GPCRDB_RESIDUES_ENDPOINT.to_string(),
            cache_dir: None,
            compound_names: None,
            compound_ids: None,
            ligand_threshold: LIGAND_DETECTION_THRESHOLD,
            cutoff: CONTACT_CUTOFF,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        if self.detector_command.is_empty() {
            return Err(Error::Config("detector command is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.ligand_threshold) {
            return Err(Error::Config(format!(
                "ligand threshold {} is outside [0, 1]",
                self.ligand_threshold
            )));
        }
        if self.cutoff <= 0.0 {
            return Err(Error::Config(format!("cutoff {} must be positive", self.cutoff)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.detector_command, vec!["plip", "-v", "-x", "-f"]);
        assert_eq!(config.ligand_threshold, 0.7);
        assert_eq!(config.cutoff, 7.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ligdyn.json");
        fs::write(&path, r#"{"workers": 2, "blast_db": "/data/gpcrdb"}"#).unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.blast_db, PathBuf::from("/data/gpcrdb"));
        assert_eq!(config.blastp, PathBuf::from("blastp"));

        fs::write(&path, r#"{"workers": 0}"#).unwrap();
        assert!(matches!(PipelineConfig::load(&path), Err(Error::Config(_))));

        fs::write(&path, r#"{"workers": "many"}"#).unwrap();
        assert!(matches!(PipelineConfig::load(&path), Err(Error::ConfigFile { .. })));
    }
}
