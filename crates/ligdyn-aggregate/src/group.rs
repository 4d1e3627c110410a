use crate::error::Result;
use crate::experiment::{ExperimentTable, SIMULATION_ID, SIMULATION_NAME};
use ligdyn_io::summary::RUN_SUMMARY_JSON;
use ligdyn_io::tables::{self, read_interactions, INTERACTIONS_CSV};
use ligdyn_io::{AnnotatedInteraction, RunSummary};
use polars::prelude::*;
use std::path::Path;

/// The results of one simulation, decorated from the experiment table.
#[derive(Debug, Clone)]
pub struct SimulationData {
    pub id: String,
    pub name: String,
    pub frame_count: usize,
    pub value: Option<f64>,
    pub interactions: Vec<AnnotatedInteraction>,
}

impl SimulationData {
    /// Loads a results directory; its directory name is the simulation id.
    pub fn load(results_dir: &Path, experiment: &ExperimentTable) -> Result<Self> {
        let id = results_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let row = experiment.get(&id)?;
        let summary = RunSummary::load(&results_dir.join(RUN_SUMMARY_JSON))?;
        let interactions = read_interactions(&results_dir.join(INTERACTIONS_CSV))?;
        log::debug!("loaded {} interactions for {id}", interactions.len());
        Ok(SimulationData {
            id,
            name: row.name.clone(),
            frame_count: summary.frame_count,
            value: row.value,
            interactions,
        })
    }
}

/// All interaction rows of the group, each tagged with its simulation.
pub fn group_table(simulations: &[SimulationData], value_column: Option<&str>) -> Result<DataFrame> {
    let rows: Vec<(&SimulationData, &AnnotatedInteraction)> = simulations
        .iter()
        .flat_map(|sim| sim.interactions.iter().map(move |row| (sim, row)))
        .collect();

    let mut columns = vec![
        Column::new(tables::FRAME.into(), rows.iter().map(|(_, r)| r.record.frame as i64).collect::<Vec<i64>>()),
        Column::new(
            tables::INTERACTION_TYPE.into(),
            rows.iter().map(|(_, r)| r.record.interaction_type.to_string()).collect::<Vec<String>>(),
        ),
        Column::new(
            tables::RESIDUE_CHAIN.into(),
            rows.iter().map(|(_, r)| r.record.residue_chain.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            tables::RESIDUE_NAME.into(),
            rows.iter().map(|(_, r)| r.record.residue_name.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            tables::RESIDUE_NUMBER.into(),
            rows.iter().map(|(_, r)| r.record.residue_number as i64).collect::<Vec<i64>>(),
        ),
        Column::new(
            tables::LIGAND_CHAIN.into(),
            rows.iter().map(|(_, r)| r.record.ligand_chain.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            tables::LIGAND_NAME.into(),
            rows.iter().map(|(_, r)| r.record.ligand_name.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            tables::LIGAND_NUMBER.into(),
            rows.iter().map(|(_, r)| r.record.ligand_number as i64).collect::<Vec<i64>>(),
        ),
        Column::new(
            tables::ALIGNED_NUMBERING.into(),
            rows.iter().map(|(_, r)| r.aligned_numbering.clone()).collect::<Vec<Option<String>>>(),
        ),
    ];
    if let Some(value_column) = value_column {
        columns.push(Column::new(
            value_column.into(),
            rows.iter().map(|(sim, _)| sim.value).collect::<Vec<Option<f64>>>(),
        ));
    }
    columns.push(Column::new(
        SIMULATION_NAME.into(),
        rows.iter().map(|(sim, _)| sim.name.clone()).collect::<Vec<String>>(),
    ));
    columns.push(Column::new(
        SIMULATION_ID.into(),
        rows.iter().map(|(sim, _)| sim.id.clone()).collect::<Vec<String>>(),
    ));
    Ok(DataFrame::new(columns)?)
}
