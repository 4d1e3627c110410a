//! Group analysis across simulations.
//!
//! Interaction tables of several runs are concatenated and tagged with their
//! simulation, then summarised as contact-fraction matrices and, when the
//! group has an experimental value per simulation, as correlations of
//! per-residue contact counts with that value.
mod correlation;
mod error;
mod experiment;
mod fraction;
mod group;

pub use correlation::{correlate, correlation_table, pearson, CorrelationRow, OVERALL};
pub use error::{Error, Result};
pub use experiment::{ExperimentRow, ExperimentTable, EXP_DATA_CSV, SIMULATION_ID, SIMULATION_NAME};
pub use fraction::{contact_fraction_matrices, residue_sort_key, ContactFractionMatrix, ALL_TYPES};
pub use group::{group_table, SimulationData};

use ligdyn_io::tables::write_csv;
use polars::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const GROUP_CSV: &str = "group.csv";
pub const CONTACT_FRACTION_CSV: &str = "contact_fraction.csv";
pub const CORRELATION_CSV: &str = "correlation.csv";
pub const GROUP_DATA_JSON: &str = "group_data.json";

#[derive(Debug, Clone, Serialize)]
pub struct GroupData {
    pub experiment: ExperimentTable,
    pub contact_fractions: Vec<ContactFractionMatrix>,
    pub correlations: Option<Vec<CorrelationRow>>,
}

/// Aggregates the results directories into `group_dir`.
///
/// `group_dir` must hold `exp_data.csv`; the result files are written next to it.
pub fn analyse_group(results_dirs: &[PathBuf], group_dir: &Path) -> Result<GroupData> {
    if results_dirs.is_empty() {
        return Err(Error::NoSimulations);
    }
    let experiment = ExperimentTable::load(&group_dir.join(EXP_DATA_CSV))?;
    let simulations = results_dirs
        .iter()
        .map(|dir| SimulationData::load(dir, &experiment))
        .collect::<Result<Vec<_>>>()?;
    log::info!("aggregating {} simulations", simulations.len());

    let mut table = group_table(&simulations, experiment.value_column.as_deref())?;
    write_csv(&mut table, &group_dir.join(GROUP_CSV))?;

    let contact_fractions = contact_fraction_matrices(&simulations);
    write_csv(&mut fractions_frame(&contact_fractions)?, &group_dir.join(CONTACT_FRACTION_CSV))?;

    let correlations = match experiment.has_covariate() {
        true => {
            let rows = correlation_table(&simulations);
            write_csv(&mut correlations_frame(&rows)?, &group_dir.join(CORRELATION_CSV))?;
            Some(rows)
        }
        false => {
            log::info!("no experimental values, skipping correlation");
            None
        }
    };

    let data = GroupData {
        experiment,
        contact_fractions,
        correlations,
    };
    fs::write(group_dir.join(GROUP_DATA_JSON), serde_json::to_string(&data)?)?;
    Ok(data)
}

/// Long format: one row per matrix cell.
pub fn fractions_frame(matrices: &[ContactFractionMatrix]) -> Result<DataFrame> {
    let (mut types, mut sims, mut residues, mut fractions) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for matrix in matrices {
        for (sim, row) in matrix.simulations.iter().zip(&matrix.values) {
            for (residue, fraction) in matrix.residues.iter().zip(row) {
                types.push(matrix.interaction_type.clone());
                sims.push(sim.clone());
                residues.push(residue.clone());
                fractions.push(*fraction);
            }
        }
    }
    Ok(df!(
        "Interaction type" => types,
        "Simulation" => sims,
        "Residue" => residues,
        "Fraction" => fractions,
    )?)
}

pub fn correlations_frame(rows: &[CorrelationRow]) -> Result<DataFrame> {
    Ok(df!(
        "Interaction type" => rows.iter().map(|r| r.interaction_type.clone()).collect::<Vec<String>>(),
        "Residue" => rows.iter().map(|r| r.residue.clone()).collect::<Vec<String>>(),
        "Correlation" => rows.iter().map(|r| r.correlation).collect::<Vec<Option<f64>>>(),
        "Covariance" => rows.iter().map(|r| r.covariance).collect::<Vec<Option<f64>>>(),
    )?)
}
