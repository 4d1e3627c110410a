//! Uniform cell grid for fixed-radius neighbour queries.
//!
//! Both the 7 Å protein-shell selection and bond inference only ever ask
//! "which points are within r of this one", so a hash of integer cells is
//! enough; no periodic images are considered.
use std::collections::HashMap;

type Cell = (i32, i32, i32);

pub fn distance_squared(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

pub struct CellGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<(usize, [f32; 3])>>,
}

impl CellGrid {
    pub fn new(points: impl IntoIterator<Item = (usize, [f32; 3])>, cell_size: f32) -> Self {
        let cell_size = cell_size.max(0.1);
        let mut cells: HashMap<Cell, Vec<(usize, [f32; 3])>> = HashMap::new();
        for (idx, pos) in points {
            cells
                .entry(cell_of(&pos, cell_size))
                .or_default()
                .push((idx, pos));
        }
        CellGrid { cell_size, cells }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Indices of all stored points within `radius` of `pos`.
    pub fn neighbors_within(&self, pos: &[f32; 3], radius: f32) -> Vec<usize> {
        let mut found = Vec::new();
        self.visit_within(pos, radius, |idx| {
            found.push(idx);
            false
        });
        found
    }

    pub fn any_within(&self, pos: &[f32; 3], radius: f32) -> bool {
        self.visit_within(pos, radius, |_| true)
    }

    // `visit` returns true to stop early; the return value reports whether it did.
    fn visit_within<F>(&self, pos: &[f32; 3], radius: f32, mut visit: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        if self.cells.is_empty() {
            return false;
        }
        let reach = (radius / self.cell_size).ceil() as i32;
        let (cx, cy, cz) = cell_of(pos, self.cell_size);
        let r2 = radius * radius;
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let Some(points) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for (idx, other) in points {
                        if distance_squared(pos, other) <= r2 && visit(*idx) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

fn cell_of(pos: &[f32; 3], cell_size: f32) -> Cell {
    (
        (pos[0] / cell_size).floor() as i32,
        (pos[1] / cell_size).floor() as i32,
        (pos[2] / cell_size).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_within() {
        let points = vec![
            (0, [0.0, 0.0, 0.0]),
            (1, [1.0, 0.0, 0.0]),
            (2, [0.0, 6.9, 0.0]),
            (3, [0.0, 7.1, 0.0]),
            (4, [-3.0, -3.0, -3.0]),
        ];
        let grid = CellGrid::new(points, 7.0);
        let mut found = grid.neighbors_within(&[0.0, 0.0, 0.0], 7.0);
        found.sort();
        assert_eq!(found, vec![0, 1, 2, 4]);
        assert!(grid.any_within(&[0.0, 14.0, 0.0], 7.0));
        assert!(!grid.any_within(&[0.0, 14.2, 0.0], 7.0));
    }

    #[test]
    fn test_empty_grid() {
        let grid = CellGrid::new(Vec::new(), 2.0);
        assert!(grid.is_empty());
        assert!(!grid.any_within(&[0.0, 0.0, 0.0], 100.0));
    }
}
