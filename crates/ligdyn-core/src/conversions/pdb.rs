use crate::info::constants::element_from_atom_name;
use crate::selection::AtomView;
use crate::AtomCollection;
use itertools::Itertools;
use pdbtbx::PDB;
use std::io::{self, Write};

impl From<&PDB> for AtomCollection {
    // the PDB API requires us to iterate:
    // PDB --> Chain --> Residue --> Atom if we want data from all.
    // Every atom is kept so indices line up with trajectory coordinates.
    fn from(pdb_data: &PDB) -> Self {
        let (coords, is_hetero, atom_names, res_ids, res_names, elements, chain_ids): (
            Vec<[f32; 3]>,
            Vec<bool>,
            Vec<String>,
            Vec<i32>,
            Vec<String>,
            Vec<String>,
            Vec<String>,
        ) = pdb_data
            .chains()
            .flat_map(|chain| {
                let chain_id = chain.id().to_string();
                chain.residues().flat_map(move |residue| {
                    let (res_number, _insertion_code) = residue.id();
                    let res_id = res_number as i32;
                    let res_name = residue.name().unwrap_or_default().to_string();
                    let chain_id = chain_id.clone();
                    residue.atoms().map(move |atom| {
                        let (x, y, z) = atom.pos();
                        let element = atom
                            .element()
                            .map(|e| e.symbol().to_ascii_uppercase())
                            .unwrap_or_else(|| element_from_atom_name(atom.name()));
                        (
                            [x as f32, y as f32, z as f32],
                            atom.hetero(),
                            atom.name().to_string(),
                            res_id,
                            res_name.clone(),
                            element,
                            chain_id.clone(),
                        )
                    })
                })
            })
            .multiunzip();

        AtomCollection::new(
            coords.len(),
            coords,
            res_ids,
            res_names,
            is_hetero,
            elements,
            atom_names,
            chain_ids,
        )
    }
}

fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() >= 4 || element.len() == 2 {
        format!("{:<4.4}", name)
    } else {
        format!(" {:<3}", name)
    }
}

// Columns 23-26 hold four characters; larger numbers wrap as VMD writes them.
fn residue_number(res_id: i32) -> i32 {
    if (-999..=9999).contains(&res_id) {
        res_id
    } else {
        res_id.rem_euclid(10_000)
    }
}

/// Writes the atoms of `view` as fixed-column PDB records followed by `END`.
///
/// Atoms are renumbered from 1; residue names are right-aligned in columns 17-20
/// so four-letter force-field names survive.
pub fn write_pdb<W: Write>(view: &AtomView, mut writer: W) -> io::Result<()> {
    for (serial, atom) in view.into_iter().enumerate() {
        let record = if atom.is_hetero { "HETATM" } else { "ATOM" };
        let chain = atom.chain_id.chars().next().unwrap_or(' ');
        let [x, y, z] = *atom.coords;
        writeln!(
            writer,
            "{:<6}{:>5} {}{:>4.4} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            record,
            (serial + 1) % 100_000,
            format_atom_name(atom.atom_name, atom.element),
            atom.res_name,
            chain,
            residue_number(*atom.res_id),
            x,
            y,
            z,
            1.0,
            0.0,
            atom.element.to_ascii_uppercase(),
        )?;
    }
    writeln!(writer, "END")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::get_atom_container;
    use itertools::Itertools;

    #[test]
    fn test_pdb_from() {
        let ac = get_atom_container();
        assert_eq!(ac.get_coords().len(), 56);

        let res_ids: Vec<i32> = ac.get_resids().iter().cloned().unique().collect();
        assert_eq!(res_ids, vec![1, 2, 3, 4, 5, 6, 101, 102, 103, 201, 202, 301]);

        let res_names: Vec<String> = ac.get_resnames().iter().cloned().unique().sorted().collect();
        assert_eq!(
            res_names,
            ["ASP", "FAR", "GLY", "HIE", "LEU", "LIG", "MET", "NA", "OL", "SER", "T3P"]
        );

        let elements: Vec<String> = ac.get_elements().iter().cloned().unique().sorted().collect();
        assert_eq!(elements, ["C", "H", "N", "NA", "O", "S"]);
    }

    #[test]
    fn test_write_pdb_round_trip() {
        let ac = get_atom_container();
        let met = ac
            .select()
            .filter(|i| ac.get_chain_id(i) == "A" && ac.get_res_name(i) == "MET")
            .into_selection();
        let view = ac.view(met);

        let mut buffer = Vec::new();
        write_pdb(&view, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[8], "END");
        assert_eq!(&lines[1][12..16], " CA ");
        assert_eq!(&lines[1][17..20], "MET");
        assert_eq!(&lines[1][21..22], "A");
        assert_eq!(lines[1][22..26].trim(), "1");
        assert_eq!(lines[1][30..38].trim(), "1.450");
        assert_eq!(lines[1][76..78].trim(), "C");
    }

    #[test]
    fn test_write_pdb_wraps_large_residue_numbers() {
        let ac = AtomCollection::new(
            1,
            vec![[1.5, 2.5, 3.5]],
            vec![12345],
            vec!["WAT".to_string()],
            vec![true],
            vec!["O".to_string()],
            vec!["O".to_string()],
            vec!["W".to_string()],
        );
        let mut buffer = Vec::new();
        write_pdb(&ac.view(ac.select_all()), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let line = text.lines().next().unwrap();

        assert_eq!(&line[17..20], "WAT");
        assert_eq!(&line[21..22], "W");
        assert_eq!(&line[22..26], "2345");
        assert_eq!(&line[30..38], "   1.500");
        assert_eq!(&line[38..46], "   2.500");
        assert_eq!(&line[46..54], "   3.500");
        assert_eq!(line[76..78].trim(), "O");
        assert_eq!(residue_number(-5), -5);
        assert_eq!(residue_number(10_000), 0);
    }
}
