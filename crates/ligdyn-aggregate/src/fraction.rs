//! Contact-fraction matrices.
use crate::group::SimulationData;
use ligdyn_io::{AnnotatedInteraction, InteractionType};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

pub const ALL_TYPES: &str = "All types";

/// Residue labels are `NAME-NUMBER`; they order by number, then by label.
pub fn residue_sort_key(label: &str) -> (i64, &str) {
    let number = label
        .rsplit_once('-')
        .and_then(|(_, number)| number.parse().ok())
        .unwrap_or(i64::MAX);
    (number, label)
}

pub fn sort_residues(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut labels: Vec<String> = labels.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    labels.sort_by(|a, b| residue_sort_key(a).cmp(&residue_sort_key(b)));
    labels
}

/// Percentage of each simulation's frames in which each residue is in contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactFractionMatrix {
    pub interaction_type: String,
    /// Row labels (simulation names), in input order.
    pub simulations: Vec<String>,
    /// Column labels, sorted by residue number.
    pub residues: Vec<String>,
    /// `values[row][column]`, in percent.
    pub values: Vec<Vec<f64>>,
}

impl ContactFractionMatrix {
    /// `filter` restricts the contacts to one type; `None` counts every type.
    /// `residues` are the column labels; residues never contacted stay at 0.
    pub fn build(simulations: &[SimulationData], filter: Option<InteractionType>, residues: &[String]) -> Self {
        let keep = |row: &&AnnotatedInteraction| filter.map_or(true, |t| row.record.interaction_type == t);

        let frames_by_residue: Vec<HashMap<String, HashSet<usize>>> = simulations
            .iter()
            .map(|sim| {
                let mut frames: HashMap<String, HashSet<usize>> = HashMap::new();
                for row in sim.interactions.iter().filter(keep) {
                    frames
                        .entry(row.record.residue_label())
                        .or_default()
                        .insert(row.record.frame);
                }
                frames
            })
            .collect();

        let values = simulations
            .iter()
            .zip(&frames_by_residue)
            .map(|(sim, frames)| {
                residues
                    .iter()
                    .map(|label| match (frames.get(label), sim.frame_count) {
                        (Some(seen), total) if total > 0 => 100.0 * seen.len() as f64 / total as f64,
                        _ => 0.0,
                    })
                    .collect()
            })
            .collect();

        ContactFractionMatrix {
            interaction_type: filter.map_or_else(|| ALL_TYPES.to_string(), |t| t.to_string()),
            simulations: simulations.iter().map(|sim| sim.name.clone()).collect(),
            residues: residues.to_vec(),
            values,
        }
    }

    pub fn get(&self, simulation: &str, residue: &str) -> Option<f64> {
        let row = self.simulations.iter().position(|s| s == simulation)?;
        let column = self.residues.iter().position(|r| r == residue)?;
        Some(self.values[row][column])
    }
}

/// Every residue contacted by any simulation, sorted by residue number.
pub fn contacted_residues(simulations: &[SimulationData]) -> Vec<String> {
    sort_residues(
        simulations
            .iter()
            .flat_map(|sim| sim.interactions.iter().map(|row| row.record.residue_label())),
    )
}

/// The "All types" matrix followed by one per interaction type present, by label.
/// All matrices share the same residue columns.
pub fn contact_fraction_matrices(simulations: &[SimulationData]) -> Vec<ContactFractionMatrix> {
    let residues = contacted_residues(simulations);
    let mut types: Vec<InteractionType> = simulations
        .iter()
        .flat_map(|sim| sim.interactions.iter().map(|row| row.record.interaction_type))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    types.sort_by_key(|t| t.to_string());

    std::iter::once(ContactFractionMatrix::build(simulations, None, &residues))
        .chain(
            types
                .into_iter()
                .map(|t| ContactFractionMatrix::build(simulations, Some(t), &residues)),
        )
        .collect()
}
