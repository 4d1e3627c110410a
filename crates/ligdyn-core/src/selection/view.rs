use super::selection::Selection;
use crate::AtomCollection;

pub struct AtomView<'a> {
    collection: &'a AtomCollection,
    selection: Selection,
}

impl<'a> AtomView<'a> {
    pub(crate) fn new(collection: &'a AtomCollection, selection: Selection) -> Self {
        AtomView {
            collection,
            selection,
        }
    }
    pub fn size(&self) -> usize {
        self.selection.indices.len()
    }
}

pub struct AtomRef<'a> {
    pub index: usize,
    pub coords: &'a [f32; 3],
    pub atom_name: &'a String,
    pub res_id: &'a i32,
    pub res_name: &'a String,
    pub chain_id: &'a String,
    pub element: &'a String,
    pub is_hetero: bool,
}

pub struct AtomIterator<'a> {
    view: &'a AtomView<'a>,
    current: usize,
}

impl<'a> IntoIterator for &'a AtomView<'a> {
    type Item = AtomRef<'a>;
    type IntoIter = AtomIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        AtomIterator {
            view: self,
            current: 0,
        }
    }
}

impl<'a> Iterator for AtomIterator<'a> {
    type Item = AtomRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = *self.view.selection.indices.get(self.current)?;
        self.current += 1;

        let collection = self.view.collection;
        Some(AtomRef {
            index: idx,
            coords: collection.get_coord(idx),
            atom_name: collection.get_atom_name(idx),
            res_id: collection.get_res_id(idx),
            res_name: collection.get_res_name(idx),
            chain_id: collection.get_chain_id(idx),
            element: collection.get_element(idx),
            is_hetero: collection.get_is_hetero(idx),
        })
    }
}
