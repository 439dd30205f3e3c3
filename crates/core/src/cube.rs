//! Cube module - 3D piece shapes and the tetracube
//!
//! A [`Cube`] is a boolean `side`^3 array indexed `[x][y][z]`. The 2D spawn rows are
//! embedded in the vertical x/z plane of the middle y slice, so a freshly spawned
//! piece faces the viewer the same way its 2D counterpart does.
//!
//! Rotation is a quarter turn of the whole cube about one axis, in place.

use arrayvec::ArrayVec;

use crate::grid::{Cell3, Piece};
use crate::pieces::{catalog, parse_rows, ShapeError, Spawn};
use crate::types::{Axis, PieceKind, Rgb, FLOOR_WIDTH};

const MAX_SIDE: usize = 4;

type Blocks = [[[bool; MAX_SIDE]; MAX_SIDE]; MAX_SIDE];

/// Filled blocks of a 3D piece inside its bounding cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    side: u8,
    blocks: Blocks,
}

impl Cube {
    pub(crate) const fn empty() -> Self {
        Self {
            side: 0,
            blocks: [[[false; MAX_SIDE]; MAX_SIDE]; MAX_SIDE],
        }
    }

    /// Build a cube from 2D spawn rows placed in the middle y slice
    pub fn from_rows(kind: PieceKind, rows: &[&str]) -> Result<Self, ShapeError> {
        let (side, minos) = parse_rows(kind, rows)?;
        let slice = (side as usize - 1) / 2;
        let mut cube = Self {
            side,
            ..Self::empty()
        };
        for (x, row) in minos {
            cube.blocks[x as usize][slice][row as usize] = true;
        }
        Ok(cube)
    }

    /// Edge length of the bounding cube
    pub fn side(&self) -> u8 {
        self.side
    }

    pub fn is_filled(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.side as usize
            && y < self.side as usize
            && z < self.side as usize
            && self.blocks[x][y][z]
    }

    /// Filled block offsets, ordered by (z, y, x)
    pub fn offsets(&self) -> ArrayVec<Cell3, 4> {
        let n = self.side as usize;
        let mut out = ArrayVec::new();
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    if self.blocks[x][y][z] && out.try_push((x as i8, y as i8, z as i8)).is_err() {
                        return out;
                    }
                }
            }
        }
        out
    }

    /// Quarter turn about `axis`
    ///
    /// Each axis rotates one coordinate plane: Z turns (x, y), X turns (y, z) and Y
    /// turns (z, x). Clockwise maps `(a, b)` to `(m - b, a)`, counter-clockwise maps
    /// it to `(b, m - a)`, where `m = side - 1`.
    pub fn rotate(&mut self, axis: Axis, clockwise: bool) {
        let n = self.side as usize;
        if n == 0 {
            return;
        }
        let m = n - 1;
        let turn = |a: usize, b: usize| if clockwise { (m - b, a) } else { (b, m - a) };

        let mut out = [[[false; MAX_SIDE]; MAX_SIDE]; MAX_SIDE];
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    if !self.blocks[x][y][z] {
                        continue;
                    }
                    let (nx, ny, nz) = match axis {
                        Axis::Z => {
                            let (a, b) = turn(x, y);
                            (a, b, z)
                        }
                        Axis::X => {
                            let (a, b) = turn(y, z);
                            (x, a, b)
                        }
                        Axis::Y => {
                            let (a, b) = turn(z, x);
                            (b, y, a)
                        }
                    };
                    out[nx][ny][nz] = true;
                }
            }
        }
        self.blocks = out;
    }
}

/// A 3D piece: kind, cube and anchor (the cube's minimum corner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetracube {
    pub kind: PieceKind,
    pub cube: Cube,
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl Tetracube {
    /// Create a new piece centered over the floor on the top layer
    pub fn new(kind: PieceKind) -> Self {
        let cube = catalog().cube(kind);
        let offset = (FLOOR_WIDTH / 2) as i8 - (cube.side() / 2) as i8;
        Self {
            kind,
            cube,
            x: offset,
            y: offset,
            z: 0,
        }
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Same piece moved by `(dx, dy, dz)`
    pub fn shifted(&self, dx: i8, dy: i8, dz: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
            ..*self
        }
    }

    /// Same piece turned a quarter about `axis`
    pub fn rotated(&self, axis: Axis, clockwise: bool) -> Self {
        let mut next = *self;
        next.cube.rotate(axis, clockwise);
        next
    }
}

impl Piece for Tetracube {
    type Coord = Cell3;

    fn occupied_cells(&self) -> ArrayVec<Cell3, 4> {
        self.cube
            .offsets()
            .iter()
            .map(|&(dx, dy, dz)| (self.x + dx, self.y + dy, self.z + dz))
            .collect()
    }
}

impl Spawn for Tetracube {
    fn spawn(kind: PieceKind) -> Self {
        Self::new(kind)
    }
}
