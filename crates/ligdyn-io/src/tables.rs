//! CSV artifacts of a simulation run, written and read through polars.
use crate::error::{Error, Result};
use crate::interaction::{InteractionRecord, InteractionType};
use crate::ligand::LigandEntry;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

pub const INTERACTIONS_CSV: &str = "interactions.csv";
pub const LIGANDS_CSV: &str = "ligands.csv";

pub const FRAME: &str = "Frame";
pub const INTERACTION_TYPE: &str = "Interaction type";
pub const RESIDUE_CHAIN: &str = "Residue chain";
pub const RESIDUE_NAME: &str = "Residue name";
pub const RESIDUE_NUMBER: &str = "Residue number";
pub const LIGAND_CHAIN: &str = "Ligand residue chain";
pub const LIGAND_NAME: &str = "Ligand residue name";
pub const LIGAND_NUMBER: &str = "Ligand residue number";
pub const ALIGNED_NUMBERING: &str = "Aligned numbering";

/// An interaction row together with its canonical residue label, if one was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedInteraction {
    pub record: InteractionRecord,
    pub aligned_numbering: Option<String>,
}

/// Builds the interactions table; `annotate` supplies the aligned numbering column.
pub fn interactions_frame<F>(records: &[InteractionRecord], annotate: F) -> Result<DataFrame>
where
    F: Fn(&InteractionRecord) -> Option<String>,
{
    let df = df!(
        FRAME => records.iter().map(|r| r.frame as i64).collect::<Vec<i64>>(),
        INTERACTION_TYPE => records.iter().map(|r| r.interaction_type.to_string()).collect::<Vec<String>>(),
        RESIDUE_CHAIN => records.iter().map(|r| r.residue_chain.clone()).collect::<Vec<String>>(),
        RESIDUE_NAME => records.iter().map(|r| r.residue_name.clone()).collect::<Vec<String>>(),
        RESIDUE_NUMBER => records.iter().map(|r| r.residue_number as i64).collect::<Vec<i64>>(),
        LIGAND_CHAIN => records.iter().map(|r| r.ligand_chain.clone()).collect::<Vec<String>>(),
        LIGAND_NAME => records.iter().map(|r| r.ligand_name.clone()).collect::<Vec<String>>(),
        LIGAND_NUMBER => records.iter().map(|r| r.ligand_number as i64).collect::<Vec<i64>>(),
        ALIGNED_NUMBERING => records.iter().map(&annotate).collect::<Vec<Option<String>>>(),
    )?;
    Ok(df)
}

pub fn ligands_frame(ligands: &[LigandEntry]) -> Result<DataFrame> {
    let df = df!(
        "ID" => ligands.iter().map(|l| l.id.clone()).collect::<Vec<Option<String>>>(),
        "Name" => ligands.iter().map(|l| l.name.clone()).collect::<Vec<Option<String>>>(),
        "Display name" => ligands.iter().map(|l| l.display_name.clone()).collect::<Vec<String>>(),
        "Ligand type" => ligands.iter().map(|l| l.ligtype.clone()).collect::<Vec<String>>(),
        "Frames seen" => ligands.iter().map(|l| l.frames_seen as i64).collect::<Vec<i64>>(),
        "SMILES" => ligands.iter().map(|l| l.smiles.clone()).collect::<Vec<String>>(),
        "InChIKey" => ligands.iter().map(|l| l.inchikey.clone()).collect::<Vec<String>>(),
    )?;
    Ok(df)
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Reads an `interactions.csv` back into records.
pub fn read_interactions(path: &Path) -> Result<Vec<AnnotatedInteraction>> {
    let df = read_csv(path)?;
    let table = Table { df: &df, path };

    let frames = table.ints(FRAME)?;
    let types = table.strings(INTERACTION_TYPE)?;
    let residue_chains = table.strings(RESIDUE_CHAIN)?;
    let residue_names = table.strings(RESIDUE_NAME)?;
    let residue_numbers = table.ints(RESIDUE_NUMBER)?;
    let ligand_chains = table.strings(LIGAND_CHAIN)?;
    let ligand_names = table.strings(LIGAND_NAME)?;
    let ligand_numbers = table.ints(LIGAND_NUMBER)?;
    let aligned = match df.get_column_index(ALIGNED_NUMBERING) {
        Some(_) => table.strings(ALIGNED_NUMBERING)?,
        None => vec![None; df.height()],
    };

    (0..df.height())
        .map(|row| {
            let label = table.required(INTERACTION_TYPE, types[row].clone())?;
            let interaction_type = InteractionType::from_str(&label).map_err(|_| Error::InvalidValue {
                path: path.to_path_buf(),
                field: INTERACTION_TYPE.to_string(),
                value: label.clone(),
            })?;
            Ok(AnnotatedInteraction {
                record: InteractionRecord {
                    frame: table.index(FRAME, frames[row])?,
                    interaction_type,
                    residue_chain: residue_chains[row].clone().unwrap_or_default(),
                    residue_name: table.required(RESIDUE_NAME, residue_names[row].clone())?,
                    residue_number: table.number(RESIDUE_NUMBER, residue_numbers[row])?,
                    ligand_chain: ligand_chains[row].clone().unwrap_or_default(),
                    ligand_name: table.required(LIGAND_NAME, ligand_names[row].clone())?,
                    ligand_number: table.number(LIGAND_NUMBER, ligand_numbers[row])?,
                },
                aligned_numbering: aligned[row].clone().filter(|label| !label.is_empty()),
            })
        })
        .collect()
}

/// Column access with errors naming the file and column.
struct Table<'a> {
    df: &'a DataFrame,
    path: &'a Path,
}

impl Table<'_> {
    fn ints(&self, name: &str) -> Result<Vec<Option<i64>>> {
        let series = self
            .df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Int64)?;
        Ok(series.i64()?.into_iter().collect())
    }

    fn strings(&self, name: &str) -> Result<Vec<Option<String>>> {
        let series = self
            .df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        Ok(series
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    fn missing(&self, field: &str) -> Error {
        Error::MissingField {
            path: self.path.to_path_buf(),
            field: field.to_string(),
        }
    }

    fn required(&self, field: &str, value: Option<String>) -> Result<String> {
        value.ok_or_else(|| self.missing(field))
    }

    fn number(&self, field: &str, value: Option<i64>) -> Result<i32> {
        let value = value.ok_or_else(|| self.missing(field))?;
        i32::try_from(value).map_err(|_| self.invalid(field, value))
    }

    fn index(&self, field: &str, value: Option<i64>) -> Result<usize> {
        let value = value.ok_or_else(|| self.missing(field))?;
        usize::try_from(value).map_err(|_| self.invalid(field, value))
    }

    fn invalid(&self, field: &str, value: i64) -> Error {
        Error::InvalidValue {
            path: self.path.to_path_buf(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse_report_dir;
    use ligdyn_test_data::TestReports;

    #[test]
    fn test_interactions_csv_round_trip() {
        let reports = TestReports::create_temp_dir().unwrap();
        let parsed = parse_report_dir(reports.path()).unwrap();

        let annotate = |r: &InteractionRecord| match r.residue_number {
            4 => Some("2x40".to_string()),
            _ => None,
        };
        let mut df = interactions_frame(&parsed.interactions, annotate).unwrap();
        assert_eq!(df.shape(), (8, 9));

        let out = tempfile::tempdir().unwrap();
        let path = out.path().join(INTERACTIONS_CSV);
        write_csv(&mut df, &path).unwrap();

        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with(
            "Frame,Interaction type,Residue chain,Residue name,Residue number,\
             Ligand residue chain,Ligand residue name,Ligand residue number,Aligned numbering"
        ));

        let rows = read_interactions(&path).unwrap();
        let records: Vec<InteractionRecord> = rows.iter().map(|row| row.record.clone()).collect();
        assert_eq!(records, parsed.interactions);
        assert_eq!(rows[0].aligned_numbering.as_deref(), Some("2x40"));
        assert_eq!(rows[1].aligned_numbering, None);
    }

    #[test]
    fn test_ligands_frame() {
        let entry = LigandEntry {
            id: Some("CHEBI:99999".to_string()),
            name: None,
            display_name: "LIGANDINE".to_string(),
            ligtype: "SMALLMOLECULE".to_string(),
            frames_seen: 3,
            smiles: "CCCCCC".to_string(),
            inchikey: "QWERTYUIOPASDF-GHJKLZXCVB-N".to_string(),
        };
        let df = ligands_frame(&[entry]).unwrap();
        assert_eq!(df.shape(), (1, 7));
        assert_eq!(
            df.column("Frames seen").unwrap().as_materialized_series().i64().unwrap().get(0),
            Some(3)
        );
    }

    #[test]
    fn test_read_interactions_bad_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INTERACTIONS_CSV);
        std::fs::write(
            &path,
            "Frame,Interaction type,Residue chain,Residue name,Residue number,\
             Ligand residue chain,Ligand residue name,Ligand residue number\n\
             1,Covalent,A,SER,2,L,LIG,101\n",
        )
        .unwrap();
        let err = read_interactions(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref value, .. } if value == "Covalent"));
    }
}
