use super::info::constants::{canonical_residue_name, is_amino_acid, is_lipid};
use crate::residue::{ResidueAtoms, ResidueIter};
use crate::selection::{AtomSelector, AtomView, Selection};
use itertools::{izip, Itertools};

/// Columnar atom storage for one topology.
///
/// Coordinates hold a single frame at a time; trajectory readers swap them
/// with [`AtomCollection::set_coords`] while the per-atom annotations stay fixed.
#[derive(Clone, Debug)]
pub struct AtomCollection {
    size: usize,
    coords: Vec<[f32; 3]>,
    res_ids: Vec<i32>,
    res_names: Vec<String>,
    is_hetero: Vec<bool>,
    elements: Vec<String>,
    atom_names: Vec<String>,
    chain_ids: Vec<String>,
}

impl AtomCollection {
    pub fn new(
        size: usize,
        coords: Vec<[f32; 3]>,
        res_ids: Vec<i32>,
        res_names: Vec<String>,
        is_hetero: Vec<bool>,
        elements: Vec<String>,
        atom_names: Vec<String>,
        chain_ids: Vec<String>,
    ) -> Self {
        AtomCollection {
            size,
            coords,
            res_ids,
            res_names,
            is_hetero,
            elements,
            atom_names,
            chain_ids,
        }
    }
    pub fn get_size(&self) -> usize {
        self.size
    }
    pub fn get_atom_name(&self, idx: usize) -> &String {
        &self.atom_names[idx]
    }
    pub fn get_chain_id(&self, idx: usize) -> &String {
        &self.chain_ids[idx]
    }
    pub fn get_coord(&self, idx: usize) -> &[f32; 3] {
        &self.coords[idx]
    }
    pub fn get_coords(&self) -> &Vec<[f32; 3]> {
        self.coords.as_ref()
    }
    pub fn get_element(&self, idx: usize) -> &String {
        &self.elements[idx]
    }
    pub fn get_elements(&self) -> &Vec<String> {
        self.elements.as_ref()
    }
    pub fn get_is_hetero(&self, idx: usize) -> bool {
        self.is_hetero[idx]
    }
    pub fn get_resnames(&self) -> &Vec<String> {
        self.res_names.as_ref()
    }
    pub fn get_res_id(&self, idx: usize) -> &i32 {
        &self.res_ids[idx]
    }
    pub fn get_resids(&self) -> &Vec<i32> {
        self.res_ids.as_ref()
    }
    pub fn get_res_name(&self, idx: usize) -> &String {
        &self.res_names[idx]
    }
    /// Chain identifiers in order of first appearance.
    pub fn chain_ids(&self) -> Vec<&str> {
        self.chain_ids.iter().map(String::as_str).unique().collect()
    }
    /// Replaces the coordinates with those of another frame.
    ///
    /// Callers guarantee the atom count matches; trajectory readers check it on open.
    pub fn set_coords(&mut self, coords: Vec<[f32; 3]>) {
        debug_assert_eq!(coords.len(), self.size);
        self.coords = coords;
    }
    /// Renames water synonyms and protonation variants to one vocabulary.
    ///
    /// Returns the number of atoms whose residue name changed.
    pub fn normalize_residue_names(&mut self) -> usize {
        let mut renamed = 0;
        for name in self.res_names.iter_mut() {
            let canonical = canonical_residue_name(name);
            if canonical != name.as_str() {
                *name = canonical.to_string();
                renamed += 1;
            }
        }
        renamed
    }
    pub fn is_protein(&self, idx: usize) -> bool {
        is_amino_acid(&self.res_names[idx])
    }
    pub fn is_lipid(&self, idx: usize) -> bool {
        is_lipid(&self.res_names[idx])
    }
    /// A new residue starts, either when the chain ID, residue ID,
    /// or residue name changes from one to the next atom.
    pub(crate) fn get_residue_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];

        starts.extend(
            izip!(&self.res_ids, &self.res_names, &self.chain_ids)
                .tuple_windows()
                .enumerate()
                .filter_map(
                    |(i, ((res_id1, name1, chain1), (res_id2, name2, chain2)))| {
                        if res_id1 != res_id2 || name1 != name2 || chain1 != chain2 {
                            Some(i + 1)
                        } else {
                            None
                        }
                    },
                ),
        );
        starts.push(self.size);
        starts
    }
    /// Iterates through the AtomCollection one residue at a time.
    pub fn iter_residues_all(&self) -> ResidueIter {
        ResidueIter::new(self, self.get_residue_starts())
    }
    pub fn iter_residues_aminoacid(&self) -> impl Iterator<Item = ResidueAtoms> {
        self.iter_residues_all()
            .filter(|residue| is_amino_acid(&residue.res_name))
    }
    pub fn select(&self) -> AtomSelector {
        AtomSelector::new(self)
    }
    pub fn select_all(&self) -> Selection {
        Selection::new((0..self.size).collect())
    }
    pub fn view(&self, selection: Selection) -> AtomView {
        AtomView::new(self, selection)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utilities::get_atom_container;
    use crate::AtomCollection;

    #[test]
    fn test_selection_api() {
        let ac: AtomCollection = get_atom_container();
        let selected_atoms = ac
            .select()
            .filter(|i| ac.get_chain_id(i) == "A" && ac.get_res_name(i) == "SER")
            .collect();
        assert_eq!(selected_atoms.size(), 6);

        let protein = ac.select().protein().collect();
        assert_eq!(protein.size(), 32);
    }

    #[test]
    fn test_residue_iterator() {
        let ac: AtomCollection = get_atom_container();
        assert_eq!(ac.get_size(), 56);
        assert_eq!(ac.iter_residues_all().count(), 12);
        assert_eq!(ac.iter_residues_aminoacid().count(), 6);
        assert_eq!(ac.chain_ids(), vec!["A", "L", "W", "M"]);
    }

    #[test]
    fn test_normalize_residue_names() {
        let mut ac: AtomCollection = get_atom_container();
        let renamed = ac.normalize_residue_names();
        assert!(renamed > 0);
        assert!(ac.get_resnames().iter().all(|name| name != "HIE"));
        assert!(ac.get_resnames().iter().all(|name| name != "T3P"));
        assert_eq!(ac.get_resnames().iter().filter(|name| *name == "WAT").count(), 6);
    }
}
