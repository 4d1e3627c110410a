use super::selection::Selection;
use super::view::AtomView;
use crate::spatial::CellGrid;
use crate::AtomCollection;

/// Chainable atom filters, each narrowing the current selection.
///
/// ```ignore
/// let ligand_shell = ac.select().not_lipid().within(7.0, &protein).collect();
/// ```
pub struct AtomSelector<'a> {
    collection: &'a AtomCollection,
    current_selection: Selection,
}

impl<'a> AtomSelector<'a> {
    pub(crate) fn new(collection: &AtomCollection) -> AtomSelector<'_> {
        AtomSelector {
            collection,
            current_selection: collection.select_all(),
        }
    }
    pub fn collect(self) -> AtomView<'a> {
        AtomView::new(self.collection, self.current_selection)
    }
    pub fn into_selection(self) -> Selection {
        self.current_selection
    }
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let filtered = self
            .current_selection
            .indices
            .iter()
            .filter(|&&idx| predicate(idx))
            .copied()
            .collect();
        self.current_selection = Selection { indices: filtered };
        self
    }
    pub fn protein(self) -> Self {
        let collection = self.collection;
        self.filter(|idx| collection.is_protein(idx))
    }
    pub fn not_lipid(self) -> Self {
        let collection = self.collection;
        self.filter(|idx| !collection.is_lipid(idx))
    }
    /// Keeps atoms within `radius` of any atom in `reference`.
    pub fn within(self, radius: f32, reference: &Selection) -> Self {
        let collection = self.collection;
        let coords = collection.get_coords();
        let grid = CellGrid::new(reference.indices.iter().map(|&i| (i, coords[i])), radius);
        self.filter(|idx| grid.any_within(&coords[idx], radius))
    }
}
