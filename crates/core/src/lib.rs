//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic for
//! both the 2D and the 3D mode. It has **no dependencies** on rendering, terminals, or
//! I/O, making it:
//!
//! - **Deterministic**: the same seed and the same inputs produce identical matches
//! - **Testable**: every rule is covered by unit tests next to the code
//! - **Portable**: runs headless, under a terminal front end, or in a benchmark
//! - **Allocation-light**: per-move paths use fixed-capacity `ArrayVec`s
//!
//! # Module Structure
//!
//! - [`grid`]: sparse board, bounds checks, landing predicate, layer clearing
//! - [`pieces`]: 2D shape catalog and SRS kick tables
//! - [`cube`]: 3D cube shapes and the tetracube piece
//! - [`rotation`]: raw, SRS and axis rotation
//! - [`rng`]: seeded uniform and 7-bag piece sequences
//! - [`scoring`]: classic (NES) and modern scoring, fall rate
//! - [`game_2d`] / [`game_3d`]: complete match state for each mode
//!
//! # Example
//!
//! ```
//! use tetris3d_core::{Game2D, GameConfig};
//! use tetris3d_types::Move2D;
//!
//! let mut game = Game2D::new(GameConfig::with_seed(12345));
//!
//! game.try_move(Move2D::Right);
//! game.try_rotate(true);
//! game.try_move(Move2D::HardDrop);
//!
//! // The landed piece locks on the next step
//! assert!(game.step());
//! assert_eq!(game.board().len(), 4);
//! ```
//!
//! # Timing
//!
//! The core has no clock. A driver calls `step()` once every
//! [`fall_rate_frames`](scoring::fall_rate_frames) frames at 60 Hz and applies
//! input before each frame's gravity step.

pub mod config;
pub mod cube;
pub mod game_2d;
pub mod game_3d;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod scoring;

pub use tetris3d_types as types;

// Re-export commonly used types for convenience
pub use config::GameConfig;
pub use cube::{Cube, Tetracube};
pub use game_2d::{Game2D, Phase};
pub use game_3d::Game3D;
pub use grid::{Board, Board2D, Board3D, Cell2, Cell3, Coord, Piece};
pub use pieces::{catalog, get_shape, PieceCatalog, ShapeError, Spawn, Tetromino};
pub use rng::{Randomizer, SimpleRng};
pub use rotation::{try_rotate_axis, try_rotate_raw, try_rotate_srs, Kick};
pub use scoring::{fall_rate_frames, ClassicScore, ModernScore, ScoreEngine, ScoreResult};
