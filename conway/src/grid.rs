// grid.rs - Owned cell buffer for one generation
//
// Cells are stored row-major as `height` rows of `width` cells. The buffer is
// only ever reshaped through the pad/resize operations below; a simulation
// tick builds a fresh Grid instead of editing this one in place.

use std::fmt;

use rand::Rng;

use crate::error::{Edge, GridError};

pub type Cell = u8;

pub const DEAD: Cell = 0;
pub const ALIVE: Cell = 1;

/// Moore neighborhood offsets as (dx, dy).
#[rustfmt::skip]
const MOORE: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// One neighbor of a cell: its value and where it was looked up.
///
/// Outside a wrapped grid the coordinates are the raw, possibly out-of-range
/// position and `value` is always `DEAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub value: Cell,
    pub x: isize,
    pub y: isize,
}

/// Per-edge amounts for [`Grid::pad`]. Positive grows, negative shrinks.
///
/// Unset edges follow a fixed chain: `right` and `bottom` fall back to `top`,
/// `left` falls back to `right`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    top: isize,
    right: Option<isize>,
    bottom: Option<isize>,
    left: Option<isize>,
}

impl Padding {
    pub fn new(top: isize) -> Self {
        Self { top, ..Default::default() }
    }

    /// Same amount on every edge.
    pub fn uniform(amount: isize) -> Self {
        Self::new(amount)
    }

    pub fn right(mut self, right: isize) -> Self {
        self.right = Some(right);
        self
    }

    pub fn bottom(mut self, bottom: isize) -> Self {
        self.bottom = Some(bottom);
        self
    }

    pub fn left(mut self, left: isize) -> Self {
        self.left = Some(left);
        self
    }

    /// Resolved amounts as (top, right, bottom, left).
    pub fn resolve(&self) -> (isize, isize, isize, isize) {
        let right = self.right.unwrap_or(self.top);
        let bottom = self.bottom.unwrap_or(self.top);
        let left = self.left.unwrap_or(right);
        (self.top, right, bottom, left)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// All-dead grid of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![DEAD; width]; height],
        }
    }

    /// Grid taking ownership of `seed`, which must be exactly `height` rows of `width` cells.
    pub fn from_seed(width: usize, height: usize, seed: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let bad_row = seed.iter().find(|row| row.len() != width);
        if seed.len() != height || bad_row.is_some() {
            return Err(GridError::DimensionMismatch {
                width,
                height,
                rows: seed.len(),
                columns: bad_row.map_or(width, Vec::len),
            });
        }
        Ok(Self { width, height, cells: seed })
    }

    /// Grid with every cell independently alive or dead.
    pub fn random(width: usize, height: usize) -> Self {
        let mut grid = Self::new(width, height);
        grid.fill_random(DEAD, ALIVE);
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Sets one cell; returns false if (x, y) is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: Cell) -> bool {
        match self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Cells top to bottom, left to right.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.cells
    }

    /// The 8 Moore neighbors of (x, y).
    ///
    /// With `wrap` the coordinates are taken modulo the grid size. Without it,
    /// positions off the grid are still yielded, with their raw coordinates
    /// and a value of `DEAD`, so summing the values always gives the live count.
    pub fn neighbors(&self, x: usize, y: usize, wrap: bool) -> impl Iterator<Item = Neighbor> + '_ {
        let (width, height) = (self.width as isize, self.height as isize);
        MOORE.iter().map(move |&(dx, dy)| {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if wrap {
                let (wx, wy) = (nx.rem_euclid(width), ny.rem_euclid(height));
                let value = self.cells[wy as usize][wx as usize];
                Neighbor { value, x: wx, y: wy }
            } else if (0..width).contains(&nx) && (0..height).contains(&ny) {
                let value = self.cells[ny as usize][nx as usize];
                Neighbor { value, x: nx, y: ny }
            } else {
                Neighbor { value: DEAD, x: nx, y: ny }
            }
        })
    }

    /// Sum of the neighbor values of (x, y).
    pub fn live_count(&self, x: usize, y: usize, wrap: bool) -> u32 {
        self.neighbors(x, y, wrap).map(|n| u32::from(n.value)).sum()
    }

    pub fn pad_top(&mut self, amount: isize, value: Cell) -> Result<&mut Self, GridError> {
        self.height = shifted(Edge::Top, self.height, amount)?;
        let n = amount.unsigned_abs();
        if amount >= 0 {
            let row = vec![value; self.width];
            self.cells.splice(0..0, std::iter::repeat_n(row, n));
        } else {
            self.cells.drain(0..n);
        }
        Ok(self)
    }

    pub fn pad_bottom(&mut self, amount: isize, value: Cell) -> Result<&mut Self, GridError> {
        self.height = shifted(Edge::Bottom, self.height, amount)?;
        let row = vec![value; self.width];
        self.cells.resize(self.height, row);
        Ok(self)
    }

    pub fn pad_left(&mut self, amount: isize, value: Cell) -> Result<&mut Self, GridError> {
        self.width = shifted(Edge::Left, self.width, amount)?;
        let n = amount.unsigned_abs();
        for row in &mut self.cells {
            if amount >= 0 {
                row.splice(0..0, std::iter::repeat_n(value, n));
            } else {
                row.drain(0..n);
            }
        }
        Ok(self)
    }

    pub fn pad_right(&mut self, amount: isize, value: Cell) -> Result<&mut Self, GridError> {
        self.width = shifted(Edge::Right, self.width, amount)?;
        for row in &mut self.cells {
            row.resize(self.width, value);
        }
        Ok(self)
    }

    /// Grows or shrinks all four edges. Every edge is checked before any is
    /// touched, so on error the grid is unchanged.
    pub fn pad(&mut self, padding: Padding, value: Cell) -> Result<&mut Self, GridError> {
        let (top, right, bottom, left) = padding.resolve();

        let height = shifted(Edge::Top, self.height, top)?;
        shifted(Edge::Bottom, height, bottom)?;
        let width = shifted(Edge::Right, self.width, right)?;
        shifted(Edge::Left, width, left)?;

        self.pad_top(top, value)?;
        self.pad_bottom(bottom, value)?;
        self.pad_right(right, value)?;
        self.pad_left(left, value)
    }

    /// Grows or shrinks to `width` x `height`.
    ///
    /// Without `center` all change happens on the bottom and right edges.
    /// With it the change is split between opposing edges, the extra row or
    /// column going to the bottom/right.
    pub fn resize(&mut self, width: usize, height: usize, value: Cell, center: bool) -> Result<&mut Self, GridError> {
        let dw = width as isize - self.width as isize;
        let dh = height as isize - self.height as isize;

        let padding = if center {
            let top = dh.div_euclid(2);
            let left = dw.div_euclid(2);
            Padding::new(top).right(dw - left).bottom(dh - top).left(left)
        } else {
            Padding::new(0).right(dw).bottom(dh).left(0)
        };
        self.pad(padding, value)
    }

    /// [`Grid::resize`] with the height defaulting to the width.
    pub fn resize_square(&mut self, width: usize, value: Cell, center: bool) -> Result<&mut Self, GridError> {
        self.resize(width, width, value, center)
    }

    /// Fills every cell with a uniform random value in `min..=max`.
    pub fn fill_random(&mut self, min: Cell, max: Cell) -> &mut Self {
        self.fill_random_with(&mut rand::rng(), min, max)
    }

    pub fn fill_random_with<R: Rng + ?Sized>(&mut self, rng: &mut R, min: Cell, max: Cell) -> &mut Self {
        let (lo, hi) = (min.min(max), min.max(max));
        for cell in self.cells.iter_mut().flatten() {
            *cell = rng.random_range(lo..=hi);
        }
        self
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(Cell::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// New size of one dimension after padding one edge by `amount`.
fn shifted(edge: Edge, current: usize, amount: isize) -> Result<usize, GridError> {
    if amount >= 0 {
        return Ok(current + amount as usize);
    }
    current
        .checked_sub(amount.unsigned_abs())
        .ok_or(GridError::ShrinkUnderflow {
            edge,
            amount: amount.unsigned_abs(),
            available: current,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn filled(width: usize, height: usize, value: Cell) -> Grid {
        Grid::from_seed(width, height, vec![vec![value; width]; height]).unwrap()
    }

    #[test]
    fn wrapped_neighbors_match_toroidal_count() {
        let mut grid = Grid::new(5, 4);
        grid.fill_random_with(&mut StdRng::seed_from_u64(7), DEAD, ALIVE);

        for y in 0..4 {
            for x in 0..5 {
                let mut expected = 0;
                for &(dx, dy) in &MOORE {
                    let nx = (x as isize + dx).rem_euclid(5) as usize;
                    let ny = (y as isize + dy).rem_euclid(4) as usize;
                    expected += u32::from(grid.get(nx, ny).unwrap());
                }
                assert_eq!(grid.live_count(x, y, true), expected, "at ({x}, {y})");
                assert_eq!(grid.neighbors(x, y, true).count(), 8);
            }
        }
    }

    #[test]
    fn wrapped_neighbors_on_single_cell_are_itself() {
        let grid = filled(1, 1, ALIVE);
        assert_eq!(grid.live_count(0, 0, true), 8);
        assert!(grid.neighbors(0, 0, true).all(|n| n.x == 0 && n.y == 0));
    }

    #[test]
    fn bounded_neighbors_off_grid_are_dead() {
        let single = filled(1, 1, ALIVE);
        assert_eq!(single.live_count(0, 0, false), 0);

        let grid = filled(3, 3, ALIVE);
        let expected = [[3, 5, 3], [5, 8, 5], [3, 5, 3]];
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(grid.live_count(x, y, false), expected[y][x], "at ({x}, {y})");
                for n in grid.neighbors(x, y, false) {
                    let inside = (0..3).contains(&n.x) && (0..3).contains(&n.y);
                    if !inside {
                        assert_eq!(n.value, DEAD);
                    }
                }
            }
        }
    }

    #[test]
    fn bounded_neighbors_keep_raw_coordinates() {
        let grid = filled(2, 2, ALIVE);
        let off: Vec<(isize, isize)> = grid
            .neighbors(0, 0, false)
            .filter(|n| n.x < 0 || n.y < 0)
            .map(|n| (n.x, n.y))
            .collect();
        assert_eq!(off, vec![(-1, -1), (0, -1), (1, -1), (-1, 0), (-1, 1)]);
    }

    #[test]
    fn seed_must_match_dimensions() {
        let err = Grid::from_seed(3, 2, vec![vec![0; 3]]).unwrap_err();
        assert!(matches!(err, GridError::DimensionMismatch { rows: 1, .. }));

        let err = Grid::from_seed(3, 2, vec![vec![0; 3], vec![0; 2]]).unwrap_err();
        assert!(matches!(err, GridError::DimensionMismatch { columns: 2, .. }));
    }

    #[test]
    fn uniform_pad_surrounds_with_value() {
        let mut grid = Grid::new(2, 2);
        grid.pad(Padding::uniform(1), 9).unwrap();

        assert_eq!((grid.width(), grid.height()), (4, 4));
        for (y, row) in grid.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                let border = x == 0 || y == 0 || x == 3 || y == 3;
                assert_eq!(cell, if border { 9 } else { 0 });
            }
        }
    }

    #[test]
    fn left_defaults_to_right_not_top() {
        let mut grid = Grid::new(2, 2);
        grid.pad(Padding::new(1).right(2), 2).unwrap();
        assert_eq!((grid.width(), grid.height()), (6, 4));
        assert_eq!(grid.rows().nth(1).unwrap(), &[2, 2, 0, 0, 2, 2]);
    }

    #[test]
    fn directional_pads_grow_and_shrink() {
        let mut grid = Grid::new(2, 2);
        grid.set(0, 0, ALIVE);

        grid.pad_right(1, 2).unwrap().pad_top(1, 3).unwrap();
        assert_eq!(grid.to_string(), "3 3 3\n1 0 2\n0 0 2\n");

        grid.pad_left(-1, 0).unwrap().pad_bottom(-1, 0).unwrap();
        assert_eq!(grid.to_string(), "3 3\n0 2\n");
    }

    #[test]
    fn shrink_underflow_leaves_grid_untouched() {
        let mut grid = Grid::new(3, 2);
        grid.set(1, 1, ALIVE);
        let before = grid.clone();

        let err = grid.pad(Padding::new(0).bottom(-1).left(-4).right(0), 0).unwrap_err();
        assert_eq!(
            err,
            GridError::ShrinkUnderflow { edge: Edge::Left, amount: 4, available: 3 }
        );
        assert_eq!(grid, before);

        assert!(grid.pad_top(-3, 0).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn resize_trims_bottom_right_unless_centered() {
        let mut grid = Grid::new(2, 2);
        grid.pad(Padding::uniform(1), 1).unwrap();

        let mut corner = grid.clone();
        corner.resize(2, 2, 0, false).unwrap();
        assert_eq!(corner.to_string(), "1 1\n1 0\n");

        grid.resize(2, 2, 0, true).unwrap();
        assert_eq!(grid.to_string(), "0 0\n0 0\n");
    }

    #[test]
    fn centered_resize_round_trips_on_even_deltas() {
        let mut grid = Grid::new(3, 3);
        grid.fill_random_with(&mut StdRng::seed_from_u64(42), DEAD, ALIVE);
        let original = grid.clone();

        grid.resize(7, 5, 0, true).unwrap();
        assert_eq!((grid.width(), grid.height()), (7, 5));
        grid.resize(3, 3, 0, true).unwrap();
        assert_eq!(grid, original);
    }

    #[test]
    fn centered_resize_splits_odd_delta_floor_first() {
        let mut grid = Grid::new(1, 1);
        grid.set(0, 0, ALIVE);
        grid.resize(4, 4, 0, true).unwrap();
        // top/left get floor(3/2) = 1
        assert_eq!(grid.get(1, 1), Some(ALIVE));
        assert_eq!(grid.iter().filter(|&c| c == ALIVE).count(), 1);
    }

    #[test]
    fn square_resize_uses_width_for_height() {
        let mut grid = Grid::from_seed(3, 1, vec![vec![1, 1, 1]]).unwrap();
        grid.resize_square(5, 0, true).unwrap();
        assert_eq!((grid.width(), grid.height()), (5, 5));
        assert_eq!(grid.to_string().lines().nth(2), Some("0 1 1 1 0"));
    }

    #[test]
    fn random_grid_holds_only_cell_states() {
        let grid = Grid::random(6, 4);
        assert_eq!((grid.width(), grid.height()), (6, 4));
        assert!(grid.iter().all(|c| c == DEAD || c == ALIVE));
    }

    #[test]
    fn fill_random_stays_in_range() {
        let mut grid = Grid::new(10, 10);
        grid.fill_random_with(&mut StdRng::seed_from_u64(1), 2, 4);
        assert!(grid.iter().all(|c| (2..=4).contains(&c)));
    }
}
