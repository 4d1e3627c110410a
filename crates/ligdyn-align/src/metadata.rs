//! Reference residue numbering from GPCRdb.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GPCRDB_RESIDUES_ENDPOINT: &str = "https://gpcrdb.org/services/residues/extended/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeNumber {
    pub scheme: String,
    pub label: String,
}

/// One residue of a reference entry, as returned by `residues/extended`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidueRecord {
    pub sequence_number: i32,
    pub amino_acid: String,
    pub protein_segment: Option<String>,
    pub display_generic_number: Option<String>,
    #[serde(default)]
    pub alternative_generic_numbers: Vec<AlternativeNumber>,
}

impl ResidueRecord {
    /// Generic number without sub-positions (`1.50x50` becomes `1x50`), falling
    /// back to the segment name.
    pub fn label(&self) -> Option<String> {
        match &self.display_generic_number {
            Some(generic) => Some(strip_sub_positions(generic)),
            None => self.protein_segment.clone(),
        }
    }
}

fn strip_sub_positions(generic: &str) -> String {
    let mut out = String::with_capacity(generic.len());
    let mut in_suffix = false;
    for c in generic.chars() {
        if c == '.' {
            in_suffix = true;
            continue;
        }
        if in_suffix && c.is_ascii_digit() {
            continue;
        }
        in_suffix = false;
        out.push(c);
    }
    out
}

/// Source of per-entry residue records.
pub trait ResidueSource {
    fn residues(&self, entry_name: &str) -> Result<Vec<ResidueRecord>>;
}

pub struct GpcrdbClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl GpcrdbClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(GpcrdbClient {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn url(&self, entry_name: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), entry_name)
    }
}

impl ResidueSource for GpcrdbClient {
    fn residues(&self, entry_name: &str) -> Result<Vec<ResidueRecord>> {
        let url = self.url(entry_name);
        log::info!("calling GPCRdb: {url}");
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(Error::Metadata {
                entry: entry_name.to_string(),
                details: format!("HTTP {}", response.status()),
            });
        }
        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ligdyn_test_data::TestFile;

    #[test]
    fn test_records_and_labels() {
        let records: Vec<ResidueRecord> = serde_json::from_slice(TestFile::gpcrdb_residues().bytes()).unwrap();
        assert_eq!(records.len(), 20);
        let sequence: String = records.iter().map(|r| r.amino_acid.as_str()).collect();
        assert_eq!(sequence, "MTPLAGNEEFMSHLDGRVWQ");

        assert_eq!(records[10].label().as_deref(), Some("1x50"));
        assert_eq!(records[10].alternative_generic_numbers[0].scheme, "BW");
        assert_eq!(records[12].label().as_deref(), Some("ICL1"));
        assert_eq!(records[0].label().as_deref(), Some("N-term"));
    }

    #[test]
    fn test_strip_sub_positions() {
        assert_eq!(strip_sub_positions("1.50x50"), "1x50");
        assert_eq!(strip_sub_positions("7.43x42"), "7x42");
        assert_eq!(strip_sub_positions("3x25"), "3x25");
        assert_eq!(strip_sub_positions("12.34.56x1"), "12x1");
    }

    #[test]
    fn test_url() {
        let client = GpcrdbClient::new(GPCRDB_RESIDUES_ENDPOINT).unwrap();
        assert_eq!(
            client.url("test_human"),
            "https://gpcrdb.org/services/residues/extended/test_human"
        );
    }
}
