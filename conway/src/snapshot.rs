// snapshot.rs - Immutable generation handed across the producer/consumer boundary

use std::sync::Arc;

use crate::grid::{ALIVE, Cell, Grid};
use crate::simulation::Charmap;

/// A frozen copy of one generation. Clones share the same cell buffer and
/// nothing can write to it, so a renderer never sees the simulation's own grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    generation: u64,
    width: usize,
    height: usize,
    cells: Arc<[Cell]>,
}

impl Snapshot {
    pub fn new(generation: u64, grid: &Grid) -> Self {
        Self {
            generation,
            width: grid.width(),
            height: grid.height(),
            cells: grid.iter().collect(),
        }
    }

    /// Number of ticks that produced this generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() rejects a zero size
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == ALIVE).count()
    }

    /// One line per row, `ALIVE` cells as the alive glyph and anything else as the dead glyph.
    pub fn render(&self, charmap: &Charmap) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            for &cell in row {
                out.push_str(if cell == ALIVE { &charmap.alive } else { &charmap.dead });
            }
            out.push('\n');
        }
        out
    }

    /// Copy back into an owned, editable grid.
    pub fn to_grid(&self) -> Grid {
        let rows = self.rows().map(<[Cell]>::to_vec).collect();
        // dimensions come from a valid grid
        Grid::from_seed(self.width, self.height, rows).unwrap_or_else(|_| Grid::new(self.width, self.height))
    }
}

impl From<&Grid> for Snapshot {
    fn from(grid: &Grid) -> Self {
        Self::new(0, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_detached_from_grid() {
        let mut grid = Grid::new(3, 2);
        grid.set(2, 1, ALIVE);
        let snap = Snapshot::new(4, &grid);

        grid.set(0, 0, ALIVE);
        assert_eq!(snap.get(0, 0), Some(0));
        assert_eq!(snap.get(2, 1), Some(ALIVE));
        assert_eq!(snap.get(3, 0), None);
        assert_eq!(snap.generation(), 4);
        assert_eq!(snap.live_cells(), 1);
    }

    #[test]
    fn renders_one_line_per_row() {
        let grid = Grid::from_seed(3, 2, vec![vec![1, 0, 1], vec![0, 9, 0]]).unwrap();
        let charmap = Charmap::new("#", ".");
        assert_eq!(Snapshot::from(&grid).render(&charmap), "#.#\n...\n");
    }

    #[test]
    fn round_trips_to_grid() {
        let grid = Grid::from_seed(2, 3, vec![vec![1, 0], vec![0, 1], vec![1, 1]]).unwrap();
        assert_eq!(Snapshot::from(&grid).to_grid(), grid);
    }
}
