//! Tetris 3D (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so callers can depend on a single
//! package: `tetris3d::{types, core, input, engine}`.

pub use tetris3d_core as core;
pub use tetris3d_engine as engine;
pub use tetris3d_input as input;
pub use tetris3d_types as types;
