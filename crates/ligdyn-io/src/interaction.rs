use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The interaction categories PLIP reports.
///
/// `Display`/`FromStr` use the labels written to result tables; report keys are
/// mapped by [`InteractionType::from_report_key`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum InteractionType {
    #[strum(serialize = "Hydrophobic")]
    #[serde(rename = "Hydrophobic")]
    Hydrophobic,
    #[strum(serialize = "Hydrogen bond")]
    #[serde(rename = "Hydrogen bond")]
    HydrogenBond,
    #[strum(serialize = "Water bridge")]
    #[serde(rename = "Water bridge")]
    WaterBridge,
    #[strum(serialize = "Salt bridge")]
    #[serde(rename = "Salt bridge")]
    SaltBridge,
    #[strum(serialize = "Pi-pi stacking")]
    #[serde(rename = "Pi-pi stacking")]
    PiStacking,
    #[strum(serialize = "Pi-cation")]
    #[serde(rename = "Pi-cation")]
    PiCation,
    #[strum(serialize = "Halogen bond")]
    #[serde(rename = "Halogen bond")]
    HalogenBond,
    #[strum(serialize = "Metal complex")]
    #[serde(rename = "Metal complex")]
    MetalComplex,
}

impl InteractionType {
    #[rustfmt::skip]
    pub fn from_report_key(key: &str) -> Option<Self> {
        match key {
            "hydrophobic_interactions" => Some(Self::Hydrophobic),
            "hydrogen_bonds"           => Some(Self::HydrogenBond),
            "water_bridges"            => Some(Self::WaterBridge),
            "salt_bridges"             => Some(Self::SaltBridge),
            "pi_stacks"                => Some(Self::PiStacking),
            "pi_cation_interactions"   => Some(Self::PiCation),
            "halogen_bonds"            => Some(Self::HalogenBond),
            "metal_complexes"          => Some(Self::MetalComplex),
            _                          => None,
        }
    }

    #[rustfmt::skip]
    pub fn report_key(&self) -> &'static str {
        match self {
            Self::Hydrophobic  => "hydrophobic_interactions",
            Self::HydrogenBond => "hydrogen_bonds",
            Self::WaterBridge  => "water_bridges",
            Self::SaltBridge   => "salt_bridges",
            Self::PiStacking   => "pi_stacks",
            Self::PiCation     => "pi_cation_interactions",
            Self::HalogenBond  => "halogen_bonds",
            Self::MetalComplex => "metal_complexes",
        }
    }

    /// Labels in table order.
    pub fn labels() -> Vec<String> {
        Self::iter().map(|t| t.to_string()).collect()
    }
}

/// One ligand contact in one frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub frame: usize,
    pub interaction_type: InteractionType,
    pub residue_chain: String,
    pub residue_name: String,
    pub residue_number: i32,
    pub ligand_chain: String,
    pub ligand_name: String,
    pub ligand_number: i32,
}

impl InteractionRecord {
    /// `NAME-NUMBER`, the label residues carry in group tables.
    pub fn residue_label(&self) -> String {
        format!("{}-{}", self.residue_name, self.residue_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_report_keys_round_trip() {
        for itype in InteractionType::iter() {
            assert_eq!(InteractionType::from_report_key(itype.report_key()), Some(itype));
            assert_eq!(InteractionType::from_str(&itype.to_string()).unwrap(), itype);
        }
        assert_eq!(InteractionType::from_report_key("ionic_interactions"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(InteractionType::PiStacking.to_string(), "Pi-pi stacking");
        assert_eq!(InteractionType::labels().len(), 8);
        assert_eq!(
            serde_json::to_string(&InteractionType::HydrogenBond).unwrap(),
            "\"Hydrogen bond\""
        );
    }
}
