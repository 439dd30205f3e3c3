//! Grid module - sparse board storage and piece geometry
//!
//! The board maps cell coordinates to the color of the piece that locked there.
//! Both game modes share the same storage; the [`Coord`] trait tells the board which
//! axis is vertical and what a horizontal layer looks like.
//!
//! Coordinates:
//! - 2D: `(x, y)`, x in `0..COLUMNS` (left to right), y in `0..ROWS` (top to bottom)
//! - 3D: `(x, y, z)`, x and y in `0..FLOOR_WIDTH`, z in `0..FLOORS` (top to bottom)
//!
//! The active piece is never stored in the board until it is set down.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use arrayvec::ArrayVec;

use crate::types::{Rgb, COLUMNS, FLOORS, FLOOR_WIDTH, ROWS};

/// 2D cell coordinate `(x, y)`
pub type Cell2 = (i8, i8);

/// 3D cell coordinate `(x, y, z)`
pub type Cell3 = (i8, i8, i8);

/// Largest number of cells in one horizontal layer (a 3D floor is 4 x 4)
pub const LAYER_CAPACITY: usize = 16;

/// Upper bound on the layers a single piece can span
pub const MAX_SPAN: usize = 4;

const _: () = assert!(COLUMNS as usize <= LAYER_CAPACITY);
const _: () = assert!(FLOOR_WIDTH as usize * FLOOR_WIDTH as usize <= LAYER_CAPACITY);

/// A cell coordinate with a distinguished vertical (gravity) axis
pub trait Coord: Copy + Eq + Hash + Debug {
    /// Number of layers along the vertical axis
    const LAYERS: i8;

    /// Per-axis range check against the static board extents
    fn in_bounds(self) -> bool;

    /// Vertical component, 0 at the top
    fn vertical(self) -> i8;

    /// Same cell moved to another layer
    fn with_vertical(self, layer: i8) -> Self;

    /// The cell directly below (one layer further down)
    #[inline]
    fn below(self) -> Self {
        self.with_vertical(self.vertical() + 1)
    }

    /// Every cell of one horizontal layer
    fn layer_cells(layer: i8) -> ArrayVec<Self, LAYER_CAPACITY>;
}

impl Coord for Cell2 {
    const LAYERS: i8 = ROWS as i8;

    #[inline]
    fn in_bounds(self) -> bool {
        let (x, y) = self;
        (0..COLUMNS as i8).contains(&x) && (0..ROWS as i8).contains(&y)
    }

    #[inline]
    fn vertical(self) -> i8 {
        self.1
    }

    #[inline]
    fn with_vertical(self, layer: i8) -> Self {
        (self.0, layer)
    }

    fn layer_cells(layer: i8) -> ArrayVec<Self, LAYER_CAPACITY> {
        (0..COLUMNS as i8).map(|x| (x, layer)).collect()
    }
}

impl Coord for Cell3 {
    const LAYERS: i8 = FLOORS as i8;

    #[inline]
    fn in_bounds(self) -> bool {
        let (x, y, z) = self;
        let side = 0..FLOOR_WIDTH as i8;
        side.contains(&x) && side.contains(&y) && (0..FLOORS as i8).contains(&z)
    }

    #[inline]
    fn vertical(self) -> i8 {
        self.2
    }

    #[inline]
    fn with_vertical(self, layer: i8) -> Self {
        (self.0, self.1, layer)
    }

    fn layer_cells(layer: i8) -> ArrayVec<Self, LAYER_CAPACITY> {
        let side = FLOOR_WIDTH as i8;
        (0..side)
            .flat_map(|y| (0..side).map(move |x| (x, y, layer)))
            .collect()
    }
}

/// Sparse occupancy map from cell to locked color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<C: Coord> {
    cells: HashMap<C, Rgb>,
}

/// The 10 x 20 board
pub type Board2D = Board<Cell2>;

/// The 4 x 4 x 20 well
pub type Board3D = Board<Cell3>;

impl<C: Coord> Board<C> {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    /// Color at `cell`, if occupied
    pub fn get(&self, cell: C) -> Option<Rgb> {
        self.cells.get(&cell).copied()
    }

    /// Whether `cell` holds a locked block
    #[inline]
    pub fn is_occupied(&self, cell: C) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Whether `cell` is inside the board and empty
    #[inline]
    pub fn is_free(&self, cell: C) -> bool {
        cell.in_bounds() && !self.is_occupied(cell)
    }

    /// Store a block. Returns false (and stores nothing) if `cell` is out of bounds.
    pub fn insert(&mut self, cell: C, color: Rgb) -> bool {
        if !cell.in_bounds() {
            return false;
        }
        self.cells.insert(cell, color);
        true
    }

    /// Remove a block, returning its color
    pub fn remove(&mut self, cell: C) -> Option<Rgb> {
        self.cells.remove(&cell)
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate occupied cells in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (C, Rgb)> + '_ {
        self.cells.iter().map(|(&cell, &color)| (cell, color))
    }

    /// Remove every block
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Check if every cell of a layer is occupied
    pub fn is_layer_full(&self, layer: i8) -> bool {
        if !(0..C::LAYERS).contains(&layer) {
            return false;
        }
        C::layer_cells(layer)
            .iter()
            .all(|&cell| self.is_occupied(cell))
    }

    /// Clear the full layers among `layers` and compact the board
    ///
    /// Only the given layers are scanned (normally the span of the piece that just
    /// locked). Compaction starts at the lowest cleared layer and walks upward, moving
    /// every surviving layer down into the next free slot. Returns the cleared layer
    /// indices sorted bottom to top.
    pub fn clear_layers<I>(&mut self, layers: I) -> ArrayVec<i8, MAX_SPAN>
    where
        I: IntoIterator<Item = i8>,
    {
        let mut cleared: ArrayVec<i8, MAX_SPAN> = ArrayVec::new();
        for layer in layers {
            if cleared.contains(&layer) || !self.is_layer_full(layer) {
                continue;
            }
            if cleared.try_push(layer).is_err() {
                break;
            }
        }

        if cleared.is_empty() {
            return cleared;
        }

        for &layer in &cleared {
            for cell in C::layer_cells(layer) {
                self.cells.remove(&cell);
            }
        }

        cleared.sort_unstable_by(|a, b| b.cmp(a));

        let mut landing = cleared[0];
        for layer in (0..=cleared[0]).rev() {
            if cleared.contains(&layer) {
                continue;
            }
            if layer != landing {
                for cell in C::layer_cells(layer) {
                    if let Some(color) = self.cells.remove(&cell) {
                        self.cells.insert(cell.with_vertical(landing), color);
                    }
                }
            }
            landing -= 1;
        }

        cleared
    }
}

impl<C: Coord> Default for Board<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything that occupies up to four board cells
pub trait Piece {
    type Coord: Coord;

    /// Shape-relative filled cells offset by the piece position
    fn occupied_cells(&self) -> ArrayVec<Self::Coord, 4>;

    /// Every occupied cell is inside the board extents
    fn in_bounds(&self) -> bool {
        self.occupied_cells().iter().all(|cell| cell.in_bounds())
    }

    /// Any occupied cell is already a board key
    fn overlaps_board(&self, board: &Board<Self::Coord>) -> bool {
        self.occupied_cells()
            .iter()
            .any(|&cell| board.is_occupied(cell))
    }

    /// Legal placement: in bounds and not overlapping
    fn fits(&self, board: &Board<Self::Coord>) -> bool {
        self.occupied_cells()
            .iter()
            .all(|&cell| board.is_free(cell))
    }

    /// Some occupied cell rests on the floor or on a locked block
    fn landed(&self, board: &Board<Self::Coord>) -> bool {
        self.occupied_cells().iter().any(|&cell| {
            let below = cell.below();
            !below.in_bounds() || board.is_occupied(below)
        })
    }

    /// Lowest and highest layer index touched by the piece
    fn vertical_span(&self) -> Option<(i8, i8)> {
        let cells = self.occupied_cells();
        let top = cells.iter().map(|c| c.vertical()).min()?;
        let bottom = cells.iter().map(|c| c.vertical()).max()?;
        Some((top, bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);
    const BLUE: Rgb = Rgb(0, 0, 255);

    fn fill_row(board: &mut Board2D, y: i8) {
        for x in 0..COLUMNS as i8 {
            board.insert((x, y), RED);
        }
    }

    #[test]
    fn test_bounds_2d() {
        assert!((0, 0).in_bounds());
        assert!((9, 19).in_bounds());
        assert!(!(-1, 0).in_bounds());
        assert!(!(10, 0).in_bounds());
        assert!(!(0, 20).in_bounds());
        assert!(!(0, -1).in_bounds());
    }

    #[test]
    fn test_bounds_3d() {
        assert!((0, 0, 0).in_bounds());
        assert!((3, 3, 19).in_bounds());
        assert!(!(4, 0, 0).in_bounds());
        assert!(!(0, 4, 0).in_bounds());
        assert!(!(0, 0, 20).in_bounds());
    }

    #[test]
    fn test_insert_rejects_out_of_bounds() {
        let mut board = Board2D::new();
        assert!(!board.insert((10, 0), RED));
        assert!(board.is_empty());
        assert!(board.insert((0, 0), RED));
        assert_eq!(board.get((0, 0)), Some(RED));
    }

    #[test]
    fn test_layer_cells_cover_floor() {
        let floor = Cell3::layer_cells(5);
        assert_eq!(floor.len(), 16);
        assert!(floor.iter().all(|c| c.2 == 5 && c.in_bounds()));
        assert_eq!(Cell2::layer_cells(0).len(), 10);
    }

    #[test]
    fn test_clear_single_row_shifts_above_down() {
        let mut board = Board2D::new();
        fill_row(&mut board, 19);
        board.insert((4, 18), BLUE);

        let cleared = board.clear_layers(18..=19);

        assert_eq!(cleared.as_slice(), &[19]);
        assert_eq!(board.len(), 1);
        assert_eq!(board.get((4, 19)), Some(BLUE));
    }

    #[test]
    fn test_clear_non_contiguous_rows() {
        let mut board = Board2D::new();
        fill_row(&mut board, 19);
        fill_row(&mut board, 17);
        board.insert((0, 18), BLUE);
        board.insert((1, 16), BLUE);

        let cleared = board.clear_layers(16..=19);

        assert_eq!(cleared.as_slice(), &[19, 17]);
        assert_eq!(board.len(), 2);
        assert_eq!(board.get((0, 19)), Some(BLUE));
        assert_eq!(board.get((1, 18)), Some(BLUE));
    }

    #[test]
    fn test_clear_ignores_rows_outside_span() {
        let mut board = Board2D::new();
        fill_row(&mut board, 19);
        let cleared = board.clear_layers(10..=12);
        assert!(cleared.is_empty());
        assert_eq!(board.len(), COLUMNS as usize);
    }

    #[test]
    fn test_clear_floor_3d() {
        let mut board = Board3D::new();
        for cell in Cell3::layer_cells(19) {
            board.insert(cell, RED);
        }
        board.insert((2, 1, 18), BLUE);

        let cleared = board.clear_layers(17..=19);

        assert_eq!(cleared.as_slice(), &[19]);
        assert_eq!(board.len(), 1);
        assert_eq!(board.get((2, 1, 19)), Some(BLUE));
    }
}
