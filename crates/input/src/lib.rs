//! Input layer (engine-facing).
//!
//! This crate is independent of any UI framework. It turns per-frame key state into
//! game actions and decides when held directions fire:
//!
//! - [`bindings`]: action to `crossterm` key-code configuration, loaded from JSON
//! - [`das`]: frame-counted delayed auto shift for held directions

pub mod bindings;
pub mod das;

pub use tetris3d_types as types;

pub use bindings::{key_name, parse_key, BindingsError, FrameInput, KeyBindings};
pub use crossterm::event::KeyCode;
pub use das::{DasConfig, DasState, InputTimer};
