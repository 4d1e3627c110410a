use crate::info::constants::{covalent_radius, is_ion};
use crate::spatial::{distance_squared, CellGrid};
use crate::AtomCollection;

const BOND_TOLERANCE: f32 = 0.45;
const MIN_BOND_LENGTH: f32 = 0.4;
const MAX_BOND_LENGTH: f32 = 2.7;

/// Bond
///
/// A covalent bond between two atom indices of an [`AtomCollection`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Bond {
    atom1: usize,
    atom2: usize,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize) -> Self {
        Bond {
            atom1: atom1.min(atom2),
            atom2: atom1.max(atom2),
        }
    }
    pub fn get_atom_indices(&self) -> (usize, usize) {
        (self.atom1, self.atom2)
    }
}

impl AtomCollection {
    /// Infers covalent bonds from the current coordinates.
    ///
    /// Two atoms bond when their distance is below the sum of their covalent radii
    /// plus a tolerance. Hydrogen pairs and ions never bond.
    pub fn connect_via_distance(&self) -> Vec<Bond> {
        let coords = self.get_coords();
        let elements = self.get_elements();
        let grid = CellGrid::new(
            coords.iter().enumerate().map(|(i, pos)| (i, *pos)),
            MAX_BOND_LENGTH,
        );

        let mut bonds = Vec::new();
        for (i, pos) in coords.iter().enumerate() {
            if is_ion(&elements[i]) {
                continue;
            }
            for j in grid.neighbors_within(pos, MAX_BOND_LENGTH) {
                if j <= i || is_ion(&elements[j]) {
                    continue;
                }
                if elements[i].eq_ignore_ascii_case("H") && elements[j].eq_ignore_ascii_case("H") {
                    continue;
                }
                let cutoff = covalent_radius(&elements[i]) + covalent_radius(&elements[j]) + BOND_TOLERANCE;
                let d2 = distance_squared(pos, &coords[j]);
                if d2 > MIN_BOND_LENGTH * MIN_BOND_LENGTH && d2 <= cutoff * cutoff {
                    bonds.push(Bond::new(i, j));
                }
            }
        }
        bonds
    }

    /// Fragment id per atom: connected components of the bond graph.
    ///
    /// Ids are dense and assigned in order of each fragment's first atom.
    pub fn fragments(&self) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.get_size()).collect();
        for bond in self.connect_via_distance() {
            let (a, b) = bond.get_atom_indices();
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra != rb {
                parent[ra.max(rb)] = ra.min(rb);
            }
        }

        let mut ids = vec![usize::MAX; self.get_size()];
        let mut next = 0;
        let mut fragment_of = Vec::with_capacity(self.get_size());
        for atom in 0..self.get_size() {
            let root = find(&mut parent, atom);
            if ids[root] == usize::MAX {
                ids[root] = next;
                next += 1;
            }
            fragment_of.push(ids[root]);
        }
        fragment_of
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}
