use super::atoms::ResidueAtoms;
use crate::AtomCollection;
use crate::Selection;

/// Walks consecutive residue boundaries; `residue_starts` ends with the atom count.
pub struct ResidueIter<'a> {
    atom_collection: &'a AtomCollection,
    residue_starts: Vec<usize>,
    current_idx: usize,
}

impl<'a> ResidueIter<'a> {
    pub fn new(atom_collection: &'a AtomCollection, residue_starts: Vec<usize>) -> Self {
        ResidueIter {
            atom_collection,
            residue_starts,
            current_idx: 0,
        }
    }
}

impl<'a> Iterator for ResidueIter<'a> {
    type Item = ResidueAtoms<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let (start_idx, end_idx) = match self.residue_starts.get(self.current_idx..self.current_idx + 2) {
            Some(&[start, end]) if start < end => (start, end),
            _ => return None,
        };
        self.current_idx += 1;

        Some(ResidueAtoms {
            start_idx,
            end_idx,
            res_id: *self.atom_collection.get_res_id(start_idx),
            res_name: self.atom_collection.get_res_name(start_idx).clone(),
            chain_id: self.atom_collection.get_chain_id(start_idx).clone(),
            atoms: Selection::new((start_idx..end_idx).collect()),
            parent: self.atom_collection,
        })
    }
}
