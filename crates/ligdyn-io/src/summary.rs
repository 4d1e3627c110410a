//! `run_data.json`: what a finished run found, in one document.
use crate::error::Result;
use crate::interaction::{InteractionRecord, InteractionType};
use crate::ligand::LigandEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const RUN_SUMMARY_JSON: &str = "run_data.json";

/// Per-frame contact counts, by type.
pub type FrameCounts = BTreeMap<usize, BTreeMap<InteractionType, usize>>;

/// Best reference hit for one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentScore {
    pub entry_name: String,
    pub accession: String,
    pub evalue: f64,
    pub identity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub created: DateTime<Utc>,
    pub frame_count: usize,
    /// Keyed by chain id.
    pub alignment_scores: BTreeMap<String, AlignmentScore>,
    pub ligands: Vec<LigandEntry>,
    pub interaction_counts: FrameCounts,
}

impl RunSummary {
    pub fn new(name: impl Into<String>, frame_count: usize) -> Self {
        RunSummary {
            name: name.into(),
            created: Utc::now(),
            frame_count,
            alignment_scores: BTreeMap::new(),
            ligands: Vec::new(),
            interaction_counts: BTreeMap::new(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

pub fn frame_interaction_counts(records: &[InteractionRecord]) -> FrameCounts {
    let mut counts = FrameCounts::new();
    for record in records {
        *counts
            .entry(record.frame)
            .or_default()
            .entry(record.interaction_type)
            .or_default() += 1;
    }
    counts
}
