//! Pieces module - tetromino catalog and SRS kick data
//!
//! Shapes are authored as text rows (`#` filled, `.` empty) in their spawn
//! orientation. The catalog validates them once, then precomputes the four 2D
//! rotation states by rotating the spawn matrix clockwise, and builds the 3D cube
//! for each kind (see [`crate::cube`]).
//!
//! Offsets use the board convention: x grows to the right, y grows downward.
//! Reference: https://tetris.wiki/SRS

use std::sync::OnceLock;

use arrayvec::ArrayVec;

use crate::cube::Cube;
use crate::grid::{Cell2, Piece};
use crate::types::{PieceKind, Rgb, Rotation, COLUMNS};

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the piece anchor
pub type PieceShape = [MinoOffset; 4];

/// Position offset tried during a rotation
pub type KickOffset = (i8, i8);

/// Five ordered kicks for every `[from state][clockwise as usize]`
pub type KickTable = [[[KickOffset; 5]; 2]; 4];

/// Errors raised while validating authored shape data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("{kind:?} shape is not square: {rows} rows but row {row} has {len} cells")]
    NotSquare {
        kind: PieceKind,
        rows: usize,
        row: usize,
        len: usize,
    },
    #[error("{kind:?} shape has side {side}, expected 2 to 4")]
    BadSide { kind: PieceKind, side: usize },
    #[error("{kind:?} shape has {count} minos, expected 4")]
    MinoCount { kind: PieceKind, count: usize },
    #[error("{kind:?} shape contains unexpected character {ch:?}")]
    BadChar { kind: PieceKind, ch: char },
}

/// Spawn orientation rows for the 2D pieces
fn spawn_rows(kind: PieceKind) -> &'static [&'static str] {
    match kind {
        PieceKind::I => &["....", "####", "....", "...."],
        PieceKind::O => &[".##", ".##", "..."],
        PieceKind::T => &[".#.", "###", "..."],
        PieceKind::S => &[".##", "##.", "..."],
        PieceKind::Z => &["##.", ".##", "..."],
        PieceKind::J => &["#..", "###", "..."],
        PieceKind::L => &["..#", "###", "..."],
    }
}

/// Spawn rows used for the 3D cubes (the O cube is 2 x 2 x 2)
fn cube_rows(kind: PieceKind) -> &'static [&'static str] {
    match kind {
        PieceKind::O => &["##", "##"],
        other => spawn_rows(other),
    }
}

/// Validated text rows: square side and the filled offsets in row-major order
pub(crate) fn parse_rows(
    kind: PieceKind,
    rows: &[&str],
) -> Result<(u8, ArrayVec<MinoOffset, 4>), ShapeError> {
    let side = rows.len();
    if !(2..=4).contains(&side) {
        return Err(ShapeError::BadSide { kind, side });
    }

    let mut minos = ArrayVec::<MinoOffset, 4>::new();
    let mut count = 0usize;
    for (y, row) in rows.iter().enumerate() {
        let len = row.chars().count();
        if len != side {
            return Err(ShapeError::NotSquare {
                kind,
                rows: side,
                row: y,
                len,
            });
        }
        for (x, ch) in row.chars().enumerate() {
            match ch {
                '#' => {
                    count += 1;
                    // Keep counting past 4 so the error reports the real total
                    let _ = minos.try_push((x as i8, y as i8));
                }
                '.' => {}
                ch => return Err(ShapeError::BadChar { kind, ch }),
            }
        }
    }

    if count != 4 {
        return Err(ShapeError::MinoCount { kind, count });
    }
    Ok((side as u8, minos))
}

/// Rotate offsets 90° clockwise inside a `side` x `side` matrix
fn rotate_cw(shape: &PieceShape, side: u8) -> PieceShape {
    let last = side as i8 - 1;
    let mut out = shape.map(|(x, y)| (last - y, x));
    out.sort_unstable_by_key(|&(x, y)| (y, x));
    out
}

/// Rotation states and matrix size for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShapeSet {
    side: u8,
    states: [PieceShape; 4],
}

impl ShapeSet {
    fn build(kind: PieceKind) -> Result<Self, ShapeError> {
        let (side, minos) = parse_rows(kind, spawn_rows(kind))?;
        let spawn: PieceShape = [minos[0], minos[1], minos[2], minos[3]];

        // O has a single degenerate state
        if kind == PieceKind::O {
            return Ok(Self {
                side,
                states: [spawn; 4],
            });
        }

        let east = rotate_cw(&spawn, side);
        let south = rotate_cw(&east, side);
        let west = rotate_cw(&south, side);
        Ok(Self {
            side,
            states: [spawn, east, south, west],
        })
    }
}

/// Every piece kind's rotation states, kick data and 3D cube
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceCatalog {
    flat: [ShapeSet; 7],
    cubes: [Cube; 7],
}

impl PieceCatalog {
    /// Validate the authored shapes and build the catalog
    pub fn try_new() -> Result<Self, ShapeError> {
        let mut flat = [ShapeSet {
            side: 0,
            states: [[(0, 0); 4]; 4],
        }; 7];
        let mut cubes = [Cube::empty(); 7];
        for (i, kind) in PieceKind::ALL.into_iter().enumerate() {
            flat[i] = ShapeSet::build(kind)?;
            cubes[i] = Cube::from_rows(kind, cube_rows(kind))?;
        }
        Ok(Self { flat, cubes })
    }

    #[inline]
    fn slot(kind: PieceKind) -> usize {
        kind as usize
    }

    /// 2D mino offsets for a kind in a rotation state
    pub fn shape(&self, kind: PieceKind, rotation: Rotation) -> PieceShape {
        self.flat[Self::slot(kind)].states[rotation.index()]
    }

    /// Side of the 2D spawn matrix (3 or 4)
    pub fn matrix_size(&self, kind: PieceKind) -> u8 {
        self.flat[Self::slot(kind)].side
    }

    /// Spawn-oriented 3D cube for a kind
    pub fn cube(&self, kind: PieceKind) -> Cube {
        self.cubes[Self::slot(kind)]
    }
}

/// The process-wide catalog
///
/// # Panics
///
/// Panics the first time it is called if the authored shape data is malformed.
pub fn catalog() -> &'static PieceCatalog {
    static CATALOG: OnceLock<PieceCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| match PieceCatalog::try_new() {
        Ok(catalog) => catalog,
        Err(err) => panic!("malformed piece data: {err}"),
    })
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    catalog().shape(kind, rotation)
}

/// J, L, S, T, Z kicks (3 x 3 matrix)
const JLSTZ_KICKS: KickTable = [
    // North
    [
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
    // East
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    // South
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    // West
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

/// I kicks (4 x 4 matrix)
const I_KICKS: KickTable = [
    [
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    ],
    [
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    ],
    [
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    ],
    [
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    ],
];

/// SRS kicks for a rotation out of `from`, keyed by matrix size
///
/// Returns `None` for sizes without a table (the O piece rotates in place).
pub fn srs_kicks(matrix_size: u8, from: Rotation, clockwise: bool) -> Option<&'static [KickOffset; 5]> {
    let table = match matrix_size {
        3 => &JLSTZ_KICKS,
        4 => &I_KICKS,
        _ => return None,
    };
    Some(&table[from.index()][clockwise as usize])
}

/// Construct a piece of a given kind at its spawn position
pub trait Spawn {
    fn spawn(kind: PieceKind) -> Self;
}

/// A 2D tetromino: kind, rotation state and anchor (top-left of its matrix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new piece at the spawn anchor, horizontally centered on the top row
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: Self::spawn_x(kind),
            y: 0,
        }
    }

    /// Spawn column for a kind's matrix
    pub fn spawn_x(kind: PieceKind) -> i8 {
        ((COLUMNS - catalog().matrix_size(kind)) / 2) as i8
    }

    /// Get the current shape
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    pub fn matrix_size(&self) -> u8 {
        catalog().matrix_size(self.kind)
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Same piece moved by `(dx, dy)`
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl Piece for Tetromino {
    type Coord = Cell2;

    fn occupied_cells(&self) -> ArrayVec<Cell2, 4> {
        self.shape()
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }
}

impl Spawn for Tetromino {
    fn spawn(kind: PieceKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_builds() {
        assert!(PieceCatalog::try_new().is_ok());
    }

    #[test]
    fn test_parse_rejects_non_square() {
        let err = parse_rows(PieceKind::T, &[".#.", "###"]).unwrap_err();
        assert!(matches!(err, ShapeError::NotSquare { .. }));

        let err = parse_rows(PieceKind::T, &[".#.", "####", "..."]).unwrap_err();
        assert!(matches!(err, ShapeError::NotSquare { row: 1, len: 4, .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_mino_count() {
        let err = parse_rows(PieceKind::T, &["##.", "###", "..."]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::MinoCount {
                kind: PieceKind::T,
                count: 5
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_character() {
        let err = parse_rows(PieceKind::L, &["..x", "###", "..."]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::BadChar {
                kind: PieceKind::L,
                ch: 'x'
            }
        );
    }

    #[test]
    fn test_t_rotation_states() {
        assert_eq!(
            get_shape(PieceKind::T, Rotation::North),
            [(1, 0), (0, 1), (1, 1), (2, 1)]
        );
        assert_eq!(
            get_shape(PieceKind::T, Rotation::East),
            [(1, 0), (1, 1), (2, 1), (1, 2)]
        );
        assert_eq!(
            get_shape(PieceKind::T, Rotation::South),
            [(0, 1), (1, 1), (2, 1), (1, 2)]
        );
        assert_eq!(
            get_shape(PieceKind::T, Rotation::West),
            [(1, 0), (0, 1), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_i_rotation_states() {
        assert_eq!(
            get_shape(PieceKind::I, Rotation::North),
            [(0, 1), (1, 1), (2, 1), (3, 1)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::East),
            [(2, 0), (2, 1), (2, 2), (2, 3)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::West),
            [(1, 0), (1, 1), (1, 2), (1, 3)]
        );
    }

    #[test]
    fn test_o_is_degenerate() {
        let spawn = get_shape(PieceKind::O, Rotation::North);
        for rotation in Rotation::ALL {
            assert_eq!(get_shape(PieceKind::O, rotation), spawn);
        }
    }

    #[test]
    fn test_spawn_x_is_centered() {
        assert_eq!(Tetromino::spawn_x(PieceKind::I), 3);
        assert_eq!(Tetromino::spawn_x(PieceKind::T), 3);
        assert_eq!(Tetromino::new(PieceKind::O).y, 0);
    }

    #[test]
    fn test_kick_lookup() {
        assert_eq!(
            srs_kicks(3, Rotation::North, true).map(|k| k[1]),
            Some((-1, 0))
        );
        assert_eq!(srs_kicks(4, Rotation::East, false).map(|k| k[1]), Some((2, 0)));
        assert!(srs_kicks(2, Rotation::North, true).is_none());
        for rotation in Rotation::ALL {
            for cw in [false, true] {
                assert_eq!(srs_kicks(3, rotation, cw).map(|k| k[0]), Some((0, 0)));
                assert_eq!(srs_kicks(4, rotation, cw).map(|k| k[0]), Some((0, 0)));
            }
        }
    }
}
