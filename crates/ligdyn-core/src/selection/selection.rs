//! Sorted atom index sets

/// Selection
///
/// Selection are sorted, de-duplicated indices that can be used to
/// identify specific sets of atoms within an [`AtomCollection`](crate::AtomCollection)
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub(crate) indices: Vec<usize>,
}

impl Selection {
    pub fn new(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Selection { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_unique_indices() {
        let a = Selection::new(vec![5, 1, 3, 3]);
        assert_eq!(a.indices(), &[1, 3, 5]);
        assert_eq!(a.len(), 3);
        assert!(Selection::new(vec![]).is_empty());
    }
}
