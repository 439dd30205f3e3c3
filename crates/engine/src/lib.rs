//! Frame-level drivers for the 2D and 3D games
//!
//! The core crate only knows about single moves and gravity steps. This crate adds the
//! 60 Hz frame loop on top: key bindings resolve raw keys into actions, held directions
//! go through the DAS timer, and gravity steps every `fall_rate_frames(level)` frames.
//!
//! ```
//! use tetris3d_engine::{Controller2D, EngineConfig};
//! use tetris3d_engine::input::{FrameInput, KeyBindings};
//!
//! let mut controller = Controller2D::new(&EngineConfig::default(), KeyBindings::default_2d());
//! for _ in 0..60 {
//!     assert!(controller.play_frame(&FrameInput::default()));
//! }
//! ```

pub mod config;
pub mod controller;

pub use tetris3d_core as core;
pub use tetris3d_input as input;
pub use tetris3d_types as types;

pub use config::EngineConfig;
pub use controller::{Controller2D, Controller3D, FallClock};
