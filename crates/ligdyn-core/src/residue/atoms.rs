//! A single residue's slice of an [`AtomCollection`].
use crate::selection::{AtomRef, AtomView};
use crate::{AtomCollection, Selection};

pub struct ResidueAtoms<'a> {
    pub start_idx: usize,
    pub end_idx: usize,
    pub res_id: i32,
    pub res_name: String,
    pub chain_id: String,
    pub atoms: Selection,
    pub parent: &'a AtomCollection,
}

impl<'a> ResidueAtoms<'a> {
    pub fn view(&self) -> AtomView {
        self.parent.view(self.atoms.clone())
    }

    pub fn atom_count(&self) -> usize {
        self.end_idx - self.start_idx
    }

    pub fn find_atom_by_name(&self, name: &str) -> Option<AtomRef<'a>> {
        let parent = self.parent;
        (self.start_idx..self.end_idx)
            .find(|&i| parent.get_atom_name(i) == name)
            .map(|i| AtomRef {
                index: i,
                coords: parent.get_coord(i),
                atom_name: parent.get_atom_name(i),
                res_id: parent.get_res_id(i),
                res_name: parent.get_res_name(i),
                chain_id: parent.get_chain_id(i),
                element: parent.get_element(i),
                is_hetero: parent.get_is_hetero(i),
            })
    }

    /// Residues without a CA atom are skipped when building chain sequences.
    pub fn has_alpha_carbon(&self) -> bool {
        self.find_atom_by_name("CA").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::get_atom_container;

    #[test]
    fn test_iteration() {
        let ac: AtomCollection = get_atom_container();
        let first_residue: ResidueAtoms = ac
            .iter_residues_aminoacid()
            .next()
            .expect("Should have at least one amino acid residue");

        assert_eq!(first_residue.start_idx, 0);
        assert_eq!(first_residue.end_idx, 8);
        assert_eq!(first_residue.atom_count(), 8);
        assert_eq!(first_residue.res_id, 1);
        assert_eq!(first_residue.res_name, "MET");
        assert_eq!(first_residue.chain_id, "A");
        assert_eq!(first_residue.view().size(), 8);
        assert!(first_residue.has_alpha_carbon());

        let sd = first_residue.find_atom_by_name("SD").expect("MET has SD");
        assert_eq!(sd.element, "S");
        assert!(first_residue.find_atom_by_name("OG").is_none());
    }
}
