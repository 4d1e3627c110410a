//! Mapping simulation residues onto reference numbering.
use crate::intervals::IntervalMap;
use crate::metadata::{ResidueRecord, ResidueSource};
use crate::search::{AlignmentResult, SequenceSearch};
use ligdyn_core::info::constants::aa1to3;
use ligdyn_core::{ChainSequence, NamedResidue};
use std::collections::{BTreeSet, HashMap};

/// Canonical labels keyed by `(chain, residue name, residue number)`.
///
/// The residue number is kept as text, the way detector reports carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueTranslation {
    labels: HashMap<(String, String, String), String>,
}

impl ResidueTranslation {
    pub fn insert(&mut self, residue: &NamedResidue, label: String) {
        self.labels.insert(key(&residue.chain, &residue.res_name, residue.res_id), label);
    }

    pub fn get(&self, chain: &str, res_name: &str, res_id: i32) -> Option<&str> {
        self.labels
            .get(&key(chain, res_name, res_id))
            .map(String::as_str)
    }

    /// Later chains win on key collisions.
    pub fn merge(&mut self, other: ResidueTranslation) {
        self.labels.extend(other.labels);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn key(chain: &str, res_name: &str, res_id: i32) -> (String, String, String) {
    (chain.to_string(), res_name.to_string(), res_id.to_string())
}

/// Labels for one chain, with the residues that did not line up cleanly.
#[derive(Debug, Clone, Default)]
pub struct ChainTranslation {
    pub labels: ResidueTranslation,
    /// Aligned residues whose name differs from the reference residue.
    pub mismatches: Vec<NamedResidue>,
    /// Residues left without a label.
    pub unmapped: Vec<NamedResidue>,
}

/// The outcome of aligning every chain of one simulation.
#[derive(Debug, Clone, Default)]
pub struct Translation {
    pub residues: ResidueTranslation,
    /// Chains whose alignment and metadata lookup both succeeded.
    pub alignments: Vec<(String, AlignmentResult)>,
}

/// Aligns each chain, fetches reference numbering for its hit and labels the
/// aligned residues. Chains that fail at any step are logged and skipped.
pub fn translate_chains(
    chains: &[ChainSequence],
    search: &dyn SequenceSearch,
    source: &dyn ResidueSource,
) -> Translation {
    let mut translation = Translation::default();
    for chain in chains {
        let alignment = match search.best_hit(&chain.sequence) {
            Ok(Some(alignment)) => alignment,
            Ok(None) => {
                log::warn!("chain {}: no alignment found", chain.chain);
                continue;
            }
            Err(e) => {
                log::warn!("chain {}: sequence search failed: {e}", chain.chain);
                continue;
            }
        };
        let records = match source.residues(&alignment.hit.entry_name) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "chain {}: failed to get residue info for {}: {e}",
                    chain.chain,
                    alignment.hit.entry_name
                );
                continue;
            }
        };
        log::info!(
            "chain {} aligned to {} ({}), e-value {:e}",
            chain.chain,
            alignment.hit.entry_name,
            alignment.hit.accession,
            alignment.evalue
        );
        let chain_translation = translate_chain(chain, &alignment, &records);
        if !chain_translation.unmapped.is_empty() {
            log::info!(
                "chain {}: {} of {} residues not mapped",
                chain.chain,
                chain_translation.unmapped.len(),
                chain.residues.len()
            );
        }
        translation.residues.merge(chain_translation.labels);
        translation.alignments.push((chain.chain.clone(), alignment));
    }
    translation
}

/// Labels one chain's residues through the alignment's segment pairs.
pub fn translate_chain(
    chain: &ChainSequence,
    alignment: &AlignmentResult,
    records: &[ResidueRecord],
) -> ChainTranslation {
    let by_number: HashMap<i32, &ResidueRecord> =
        records.iter().map(|r| (r.sequence_number, r)).collect();
    let map = IntervalMap::from_segments(&alignment.segments);

    let mut result = ChainTranslation::default();
    let mut mapped = BTreeSet::new();
    for query in map.query_positions() {
        let (Some(residue), Some(target)) = (chain.residues.get(query), map.get(query)) else {
            continue;
        };
        let Some(record) = i32::try_from(target + 1).ok().and_then(|n| by_number.get(&n)) else {
            continue;
        };
        let reference_name = record.amino_acid.chars().next().map(aa1to3).unwrap_or("UNK");
        if reference_name != residue.res_name {
            log::warn!(
                "mapping mismatch: {}:{}{} aligned to {}{}",
                residue.chain,
                residue.res_name,
                residue.res_id,
                reference_name,
                record.sequence_number
            );
            result.mismatches.push(residue.clone());
        }
        if let Some(label) = record.label() {
            result.labels.insert(residue, label);
            mapped.insert(query);
        }
    }

    for (idx, residue) in chain.residues.iter().enumerate() {
        if !mapped.contains(&idx) {
            log::warn!(
                "residue not mapped: {}:{}{}",
                residue.chain,
                residue.res_name,
                residue.res_id
            );
            result.unmapped.push(residue.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::FixtureSource;
    use crate::error::{Error, Result};
    use crate::search::{parse_blast_xml, HitId, SegmentPair};
    use ligdyn_test_data::TestFile;

    fn chain_a() -> ChainSequence {
        let residues = ["MET", "SER", "HIS", "LEU", "ASP", "GLY"]
            .iter()
            .enumerate()
            .map(|(i, name)| NamedResidue {
                chain: "A".to_string(),
                res_name: name.to_string(),
                res_id: i as i32 + 1,
            })
            .collect();
        ChainSequence {
            chain: "A".to_string(),
            sequence: "MSHLDG".to_string(),
            residues,
        }
    }

    struct FixtureSearch;

    impl SequenceSearch for FixtureSearch {
        fn best_hit(&self, sequence: &str) -> Result<Option<AlignmentResult>> {
            match sequence {
                "MSHLDG" => parse_blast_xml(std::str::from_utf8(TestFile::blast_hit().bytes()).unwrap()),
                "FAIL" => Err(Error::Search {
                    program: "blastp".to_string(),
                    details: "exit status: 2".to_string(),
                }),
                _ => Ok(None),
            }
        }
    }

    #[test]
    fn test_translate_chains() {
        let translation = translate_chains(&[chain_a()], &FixtureSearch, &FixtureSource::default());
        let labels = &translation.residues;
        assert_eq!(labels.len(), 6);
        assert_eq!(labels.get("A", "MET", 1), Some("1x50"));
        assert_eq!(labels.get("A", "SER", 2), Some("1x51"));
        assert_eq!(labels.get("A", "HIS", 3), Some("ICL1"));
        assert_eq!(labels.get("A", "LEU", 4), Some("2x40"));
        assert_eq!(labels.get("A", "ASP", 5), Some("2x50"));
        assert_eq!(labels.get("A", "GLY", 6), Some("2x51"));
        assert_eq!(labels.get("A", "GLY", 7), None);

        assert_eq!(translation.alignments.len(), 1);
        assert_eq!(translation.alignments[0].0, "A");
        assert_eq!(translation.alignments[0].1.hit.accession, "P99999");
    }

    #[test]
    fn test_failed_chains_are_skipped() {
        let mut failing = chain_a();
        failing.chain = "B".to_string();
        failing.sequence = "FAIL".to_string();
        let mut unaligned = chain_a();
        unaligned.chain = "C".to_string();
        unaligned.sequence = "WWWW".to_string();

        let translation = translate_chains(
            &[failing, unaligned, chain_a()],
            &FixtureSearch,
            &FixtureSource::default(),
        );
        assert_eq!(translation.residues.len(), 6);
        assert_eq!(translation.alignments.len(), 1);

        let none = translate_chains(&[], &FixtureSearch, &FixtureSource::default());
        assert!(none.residues.is_empty());
    }

    #[test]
    fn test_partial_and_mismatched_alignment() {
        // query [0,5) onto target [10,15): GLY6 stays unmapped
        let alignment = AlignmentResult {
            hit: HitId::parse("P99999|test_human").unwrap(),
            evalue: 1e-3,
            identity: 1.0,
            segments: vec![SegmentPair {
                query: 0..5,
                target: 10..15,
            }],
        };
        let records: Vec<ResidueRecord> = serde_json::from_slice(TestFile::gpcrdb_residues().bytes()).unwrap();
        let aligned = translate_chain(&chain_a(), &alignment, &records);
        assert_eq!(aligned.labels.len(), 5);
        assert_eq!(aligned.labels.get("A", "ASP", 5), Some("2x50"));
        assert_eq!(aligned.labels.get("A", "GLY", 6), None);
        assert!(aligned.mismatches.is_empty());
        let unmapped: Vec<&str> = aligned.unmapped.iter().map(|r| r.res_name.as_str()).collect();
        assert_eq!(unmapped, vec!["GLY"]);

        // shifted by one: every pair mismatches but still maps
        let shifted = AlignmentResult {
            segments: vec![SegmentPair {
                query: 0..6,
                target: 11..17,
            }],
            ..alignment
        };
        let shifted = translate_chain(&chain_a(), &shifted, &records);
        assert_eq!(shifted.labels.get("A", "MET", 1), Some("1x51"));
        assert_eq!(shifted.labels.get("A", "GLY", 6), Some("C-term"));
        assert_eq!(shifted.mismatches.len(), 6);
        assert!(shifted.unmapped.is_empty());
    }
}
