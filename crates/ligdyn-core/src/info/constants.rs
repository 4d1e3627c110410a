//! # Constants
//!
//! Residue vocabularies used when loading and filtering MD structures.
//!
//! ## Residue Types
//!
//! - `is_amino_acid()` - canonical amino acids plus common force-field variants
//! - `is_water()` - water synonyms written by the usual MD packages
//! - `is_lipid()` - membrane lipids that are dropped from extracted frames
//!
//! ## Naming
//!
//! - `canonical_residue_name()` - collapses water and protonation variants
//!   onto one vocabulary so report residue names match the topology
//! - `aa3to1()` / `aa1to3()` - amino-acid code conversion
//!
//! ## Covalent Radii
//!
//! Used to infer bonds, and from them molecular fragments, when a topology
//! does not carry explicit connectivity.

/// Name every water residue is renamed to.
pub const WATER_NAME: &str = "WAT";

pub const WATER_SYNONYMS: [&str; 14] = [
    "H2O", "HOH", "OH2", "HHO", "OHH", "TIP", "T3P", "T4P", "T5P", "SOL", "TIP2", "TIP3", "TIP4",
    "SPC",
];

#[rustfmt::skip]
pub const PROTONATION_VARIANTS: [(&str, &str); 7] = [
    ("HIE", "HIS"), ("HIP", "HIS"), ("HID", "HIS"),
    ("ASH", "ASP"), ("GLH", "GLU"),
    ("CYX", "CYS"), ("CYM", "CYS"),
];

#[rustfmt::skip]
const LIPIDS: [&str; 40] = [
    "DLPE", "DMPC", "DPPC", "GPC",  "LPPC", "PALM", "PC",   "PGCL", "POPC", "POPE",
    "POPS", "POPG", "POPA", "POPI", "DOPC", "DOPE", "DOPS", "DOPG", "DSPC", "DLPC",
    "DMPE", "DMPG", "DPPE", "DPPG", "DYPC", "DYPE", "SDPC", "SAPC", "SOPC", "PSM",
    "CHL1", "CHOL", "CLR",  "ERG",  "PA",   "PE",   "OL",   "LA",   "MY",   "PGR",
];

#[rustfmt::skip]
pub fn aa3to1(aa: &str) -> char {
    match aa {
        "ALA" => 'A', "CYS" => 'C', "ASP" => 'D',
        "GLU" => 'E', "PHE" => 'F', "GLY" => 'G',
        "HIS" => 'H', "ILE" => 'I', "LYS" => 'K',
        "LEU" => 'L', "MET" => 'M', "ASN" => 'N',
        "PRO" => 'P', "GLN" => 'Q', "ARG" => 'R',
        "SER" => 'S', "THR" => 'T', "VAL" => 'V',
        "TRP" => 'W', "TYR" => 'Y', _     => 'X',
    }
}

#[rustfmt::skip]
pub fn aa1to3(aa: char) -> &'static str {
    match aa.to_ascii_uppercase() {
        'A' => "ALA", 'C' => "CYS", 'D' => "ASP",
        'E' => "GLU", 'F' => "PHE", 'G' => "GLY",
        'H' => "HIS", 'I' => "ILE", 'K' => "LYS",
        'L' => "LEU", 'M' => "MET", 'N' => "ASN",
        'P' => "PRO", 'Q' => "GLN", 'R' => "ARG",
        'S' => "SER", 'T' => "THR", 'V' => "VAL",
        'W' => "TRP", 'Y' => "TYR", _   => "UNK",
    }
}

pub fn is_water(res_name: &str) -> bool {
    res_name == WATER_NAME || WATER_SYNONYMS.contains(&res_name)
}

pub fn is_lipid(res_name: &str) -> bool {
    LIPIDS.contains(&res_name)
}

/// Amino acids, including protonation variants that have not been renamed yet.
pub fn is_amino_acid(res_name: &str) -> bool {
    aa3to1(res_name) != 'X'
        || PROTONATION_VARIANTS
            .iter()
            .any(|(variant, _)| *variant == res_name)
        || matches!(res_name, "MSE" | "SEC" | "PYL" | "HSD" | "HSE" | "HSP" | "LYN")
}

/// Maps water synonyms to [`WATER_NAME`] and protonation variants to their
/// canonical residue; anything else is returned unchanged.
pub fn canonical_residue_name(res_name: &str) -> &str {
    if is_water(res_name) {
        return WATER_NAME;
    }
    PROTONATION_VARIANTS
        .iter()
        .find(|(variant, _)| *variant == res_name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(res_name)
}

#[rustfmt::skip]
/// Covalent radii in Angstrom (Cordero et al. 2008), unknown elements fall back to carbon.
pub fn covalent_radius(element: &str) -> f32 {
    match element.to_ascii_uppercase().as_str() {
        "H"  => 0.31, "C"  => 0.76, "N"  => 0.71, "O"  => 0.66,
        "F"  => 0.57, "P"  => 1.07, "S"  => 1.05, "CL" => 1.02,
        "BR" => 1.20, "I"  => 1.39, "SE" => 1.20, "B"  => 0.84,
        "SI" => 1.11, "NA" => 1.66, "K"  => 2.03, "MG" => 1.41,
        "CA" => 1.76, "ZN" => 1.22, "FE" => 1.32, "MN" => 1.39,
        "CU" => 1.32, "CO" => 1.26, "NI" => 1.24,
        _    => 0.76,
    }
}

/// Ions never bond covalently, even when they sit close to a ligand.
pub fn is_ion(element: &str) -> bool {
    matches!(
        element.to_ascii_uppercase().as_str(),
        "NA" | "K" | "CL" | "MG" | "CA" | "ZN" | "LI" | "CS" | "RB"
    )
}

/// Best-effort element guess from a PDB atom name, used when the element column is empty.
pub fn element_from_atom_name(atom_name: &str) -> String {
    let letters: String = atom_name
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let upper = letters.to_ascii_uppercase();
    for two in ["CL", "BR", "NA", "MG", "ZN", "FE"] {
        if upper.starts_with(two) && upper.len() == 2 {
            return two.to_string();
        }
    }
    upper.chars().next().map(String::from).unwrap_or_default()
}
