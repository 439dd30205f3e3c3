//! Rotation module - rotation with and without wall kicks
//!
//! All functions mutate the piece only on success; a refused rotation leaves position
//! and rotation state exactly as they were.

use crate::cube::Tetracube;
use crate::grid::{Board2D, Board3D, Piece};
use crate::pieces::{srs_kicks, KickOffset, Tetromino};
use crate::types::{Axis, PieceKind};

/// The kick that made a rotation legal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kick {
    pub offset: KickOffset,
    /// Position in the kick list (0 is the unshifted rotation)
    pub index: usize,
}

impl Kick {
    pub const NONE: Kick = Kick {
        offset: (0, 0),
        index: 0,
    };
}

/// Rotate in place without kicks
pub fn try_rotate_raw(piece: &mut Tetromino, board: &Board2D, clockwise: bool) -> bool {
    let candidate = Tetromino {
        rotation: piece.rotation.rotate(clockwise),
        ..*piece
    };
    if candidate.fits(board) {
        *piece = candidate;
        true
    } else {
        false
    }
}

/// Rotate with SRS wall kicks
///
/// The five kicks for the piece's matrix size are tried in order and the first legal
/// one is committed. The O piece rotates in place with the trivial kick.
pub fn try_rotate_srs(piece: &mut Tetromino, board: &Board2D, clockwise: bool) -> Option<Kick> {
    if piece.kind == PieceKind::O {
        return try_rotate_raw(piece, board, clockwise).then_some(Kick::NONE);
    }

    let kicks = srs_kicks(piece.matrix_size(), piece.rotation, clockwise)?;
    let rotation = piece.rotation.rotate(clockwise);

    for (index, &(dx, dy)) in kicks.iter().enumerate() {
        let candidate = Tetromino {
            rotation,
            x: piece.x + dx,
            y: piece.y + dy,
            ..*piece
        };
        if candidate.fits(board) {
            *piece = candidate;
            return Some(Kick {
                offset: (dx, dy),
                index,
            });
        }
    }

    None
}

/// Quarter-turn a 3D piece about `axis`; bounds and overlap only, no kicks
pub fn try_rotate_axis(
    piece: &mut Tetracube,
    board: &Board3D,
    axis: Axis,
    clockwise: bool,
) -> bool {
    let candidate = piece.rotated(axis, clockwise);
    if candidate.fits(board) {
        *piece = candidate;
        true
    } else {
        false
    }
}
