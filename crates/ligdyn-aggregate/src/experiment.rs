//! The per-group covariate table (`exp_data.csv`).
use crate::error::{Error, Result};
use ligdyn_io::tables::read_csv;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

pub const EXP_DATA_CSV: &str = "exp_data.csv";
pub const SIMULATION_ID: &str = "Simulation ID";
pub const SIMULATION_NAME: &str = "Simulation name";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentRow {
    pub id: String,
    pub name: String,
    pub value: Option<f64>,
}

/// Simulations of a group with their display names and, optionally, one
/// experimental value each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentTable {
    /// Header of the covariate column, when the table has one.
    pub value_column: Option<String>,
    pub rows: Vec<ExperimentRow>,
}

impl ExperimentTable {
    /// Reads the table; the first column other than id and name is the covariate.
    pub fn load(path: &Path) -> Result<Self> {
        let df = read_csv(path)?;
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        if !names.iter().any(|n| n == SIMULATION_ID) {
            return Err(Error::MissingColumn {
                path: path.to_path_buf(),
                column: SIMULATION_ID.to_string(),
            });
        }

        let ids = string_column(&df, SIMULATION_ID)?;
        let display = match names.iter().any(|n| n == SIMULATION_NAME) {
            true => string_column(&df, SIMULATION_NAME)?,
            false => ids.clone(),
        };
        let value_column = names
            .iter()
            .find(|n| *n != SIMULATION_ID && *n != SIMULATION_NAME)
            .cloned();
        let values: Vec<Option<f64>> = match &value_column {
            Some(column) => df
                .column(column)?
                .as_materialized_series()
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .collect(),
            None => vec![None; df.height()],
        };

        let rows = ids
            .into_iter()
            .zip(display)
            .zip(values)
            .filter_map(|((id, name), value)| {
                let id = id?;
                let name = name.unwrap_or_else(|| id.clone());
                Some(ExperimentRow { id, name, value })
            })
            .collect();
        Ok(ExperimentTable { value_column, rows })
    }

    pub fn get(&self, id: &str) -> Result<&ExperimentRow> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .ok_or_else(|| Error::UnknownSimulation(id.to_string()))
    }

    pub fn has_covariate(&self) -> bool {
        self.value_column.is_some()
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}
