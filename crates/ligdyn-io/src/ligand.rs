//! Ligand catalog built while reading reports.
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Fraction of frames a ligand must appear in to be reported.
pub const LIGAND_DETECTION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigandCandidate {
    pub inchikey: String,
    pub name: String,
    pub ligtype: String,
    pub smiles: String,
    pub frames_seen: usize,
}

impl LigandCandidate {
    /// Ratio of frames containing this ligand; kept when it reaches `threshold`.
    pub fn passes(&self, frame_count: usize, threshold: f64) -> bool {
        frame_count > 0 && self.frames_seen as f64 / frame_count as f64 >= threshold
    }
}

/// Ligands keyed by InChIKey, in order of first sighting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LigandCatalog {
    ligands: Vec<LigandCandidate>,
    index: HashMap<String, usize>,
}

impl LigandCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one binding site of the ligand.
    ///
    /// Every site counts, so a ligand bound twice in one frame is seen twice.
    /// Returns true when the ligand is new to the catalog.
    pub fn observe(&mut self, identity: LigandCandidate) -> bool {
        let inchikey = identity.inchikey.clone();
        match self.index.get(&inchikey) {
            Some(&idx) => {
                self.ligands[idx].frames_seen += 1;
                false
            }
            None => {
                log::info!("adding new ligand: {inchikey}");
                self.index.insert(inchikey, self.ligands.len());
                self.ligands.push(LigandCandidate {
                    frames_seen: 1,
                    ..identity
                });
                true
            }
        }
    }

    pub fn get(&self, inchikey: &str) -> Option<&LigandCandidate> {
        self.index.get(inchikey).map(|&idx| &self.ligands[idx])
    }

    pub fn ligands(&self) -> &[LigandCandidate] {
        &self.ligands
    }

    pub fn len(&self) -> usize {
        self.ligands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ligands.is_empty()
    }

    /// Ligands seen in at least `threshold` of `frame_count` frames.
    pub fn retained(&self, frame_count: usize, threshold: f64) -> Vec<LigandCandidate> {
        self.ligands
            .iter()
            .filter(|ligand| {
                let keep = ligand.passes(frame_count, threshold);
                if !keep {
                    log::info!(
                        "skipping ligand {} below threshold, seen in {} out of {} frames",
                        ligand.inchikey,
                        ligand.frames_seen,
                        frame_count
                    );
                }
                keep
            })
            .cloned()
            .collect()
    }
}

/// A retained ligand, with identifiers from the compound lookup tables when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigandEntry {
    pub id: Option<String>,
    pub name: Option<String>,
    pub display_name: String,
    pub ligtype: String,
    pub frames_seen: usize,
    pub smiles: String,
    pub inchikey: String,
}

/// InChIKey lookup tables (ChEBI id and compound name).
///
/// Built once and passed in; both tables may be empty when the reference
/// files were never downloaded.
#[derive(Debug, Clone, Default)]
pub struct CompoundNames {
    names: HashMap<String, String>,
    chebi_ids: HashMap<String, String>,
}

impl CompoundNames {
    pub fn new(names: HashMap<String, String>, chebi_ids: HashMap<String, String>) -> Self {
        CompoundNames { names, chebi_ids }
    }

    /// Loads the JSON tables; a missing file yields an empty table.
    pub fn load(names_path: Option<&Path>, chebi_ids_path: Option<&Path>) -> Result<Self> {
        Ok(CompoundNames {
            names: load_table(names_path)?,
            chebi_ids: load_table(chebi_ids_path)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.chebi_ids.is_empty()
    }

    pub fn enrich(&self, ligand: &LigandCandidate) -> LigandEntry {
        LigandEntry {
            id: self.chebi_ids.get(&ligand.inchikey).cloned(),
            name: self.names.get(&ligand.inchikey).cloned(),
            display_name: ligand.name.clone(),
            ligtype: ligand.ligtype.clone(),
            frames_seen: ligand.frames_seen,
            smiles: ligand.smiles.clone(),
            inchikey: ligand.inchikey.clone(),
        }
    }
}

fn load_table(path: Option<&Path>) -> Result<HashMap<String, String>> {
    match path {
        Some(path) if path.is_file() => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        Some(path) => {
            log::warn!("compound table {} not found, ligands stay unnamed", path.display());
            Ok(HashMap::new())
        }
        None => Ok(HashMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ligdyn_test_data::TestFile;

    fn candidate(inchikey: &str) -> LigandCandidate {
        LigandCandidate {
            inchikey: inchikey.to_string(),
            name: "LIGANDINE".to_string(),
            ligtype: "SMALLMOLECULE".to_string(),
            smiles: "CCCCCC".to_string(),
            frames_seen: 0,
        }
    }

    #[test]
    fn test_observe_counts_every_binding_site() {
        let mut catalog = LigandCatalog::new();
        assert!(catalog.observe(candidate("AAA")));
        assert!(!catalog.observe(candidate("AAA")));
        assert!(!catalog.observe(candidate("AAA")));
        assert!(catalog.observe(candidate("BBB")));
        assert_eq!(catalog.get("AAA").unwrap().frames_seen, 3);
        assert_eq!(catalog.get("BBB").unwrap().frames_seen, 1);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ligands()[1].inchikey, "BBB");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut catalog = LigandCatalog::new();
        for _ in 0..7 {
            catalog.observe(candidate("SEVEN"));
        }
        for _ in 0..6 {
            catalog.observe(candidate("SIX"));
        }
        let kept = catalog.retained(10, LIGAND_DETECTION_THRESHOLD);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].inchikey, "SEVEN");
        assert!(catalog.retained(0, LIGAND_DETECTION_THRESHOLD).is_empty());
    }

    #[test]
    fn test_enrich_from_lookup_tables() {
        let (names, _t1) = TestFile::inchikey_to_name().create_temp().unwrap();
        let (ids, _t2) = TestFile::inchikey_to_chebi_id().create_temp().unwrap();
        let lookup = CompoundNames::load(Some(Path::new(&names)), Some(Path::new(&ids))).unwrap();

        let entry = lookup.enrich(&candidate("QWERTYUIOPASDF-GHJKLZXCVB-N"));
        assert_eq!(entry.id.as_deref(), Some("CHEBI:99999"));
        assert_eq!(entry.name.as_deref(), Some("ligandine"));

        let unknown = lookup.enrich(&candidate("NOTINTHETABLE"));
        assert_eq!(unknown.id, None);
        assert_eq!(unknown.display_name, "LIGANDINE");

        let empty = CompoundNames::load(Some(Path::new("/nonexistent/names.json")), None).unwrap();
        assert!(empty.is_empty());
    }
}
