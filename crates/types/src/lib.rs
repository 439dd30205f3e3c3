//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used by every other crate in the
//! workspace. All types are plain data with no behavior beyond small conversions,
//! so they can be shared by the engine, the input layer and any external renderer.
//!
//! # Board Dimensions
//!
//! | Mode | Extents | Vertical axis |
//! |------|---------|---------------|
//! | 2D | `COLUMNS` x `ROWS` = 10 x 20 | y (top to bottom) |
//! | 3D | `FLOOR_WIDTH` x `FLOOR_WIDTH` x `FLOORS` = 4 x 4 x 20 | z (top to bottom) |
//!
//! # Frame Timing
//!
//! The engine is frame-stepped at 60 Hz. Timing values are frame counts,
//! never milliseconds:
//!
//! - `FIRST_DELAY`: 15 frames between the instant move and the first auto-repeat
//! - `SECOND_DELAY`: 6 frames between subsequent auto-repeats
//!
//! # Examples
//!
//! ```
//! use tetris3d_types::{PieceKind, Rotation, COLUMNS, ROWS};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
//!
//! assert_eq!(COLUMNS, 10);
//! assert_eq!(ROWS, 20);
//! ```

use serde::{Deserialize, Serialize};

/// 2D board width in cells
pub const COLUMNS: u8 = 10;

/// 2D board height in cells
pub const ROWS: u8 = 20;

/// 3D floor side length (the floor is square)
pub const FLOOR_WIDTH: u8 = 4;

/// Number of floors in the 3D well
pub const FLOORS: u8 = 20;

/// Frames between the instant move and the first auto-repeat
pub const FIRST_DELAY: u32 = 15;

/// Frames between auto-repeats once repeating
pub const SECOND_DELAY: u32 = 6;

/// Classic (NES) line clear table, multiplied by (level + 1)
pub const CLASSIC_LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Modern line clear table for clears without a T-spin, multiplied by (level + 1)
pub const MODERN_LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Mini T-spin base: `MINI_TSPIN_BASE * 2^lines`
pub const MINI_TSPIN_BASE: u32 = 100;

/// Full T-spin base: `FULL_TSPIN_BASE + FULL_TSPIN_PER_LINE * lines`
pub const FULL_TSPIN_BASE: u32 = 400;

/// Full T-spin increment per cleared line
pub const FULL_TSPIN_PER_LINE: u32 = 400;

/// Combo bonus per combo step, multiplied by combo count and level
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// All-clear multiplier. Threaded through scoring but currently neutral.
pub const ALL_CLEAR_MULTIPLIER: u32 = 1;

/// Points per soft-dropped cell (modern scoring)
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per hard-dropped cell (modern scoring)
pub const HARD_DROP_POINTS: u32 = 2;

/// The seven tetromino piece kinds
///
/// Colors follow the reference palette:
/// - **I**: Cyan
/// - **O**: Yellow
/// - **T**: Purple
/// - **S**: Green
/// - **Z**: Red
/// - **J**: Blue
/// - **L**: Orange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris3d_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Canonical display color
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb(0, 255, 255),
            PieceKind::O => Rgb(255, 255, 0),
            PieceKind::T => Rgb(128, 0, 255),
            PieceKind::S => Rgb(0, 255, 0),
            PieceKind::Z => Rgb(255, 0, 0),
            PieceKind::J => Rgb(0, 0, 255),
            PieceKind::L => Rgb(255, 128, 0),
        }
    }
}

/// An RGB color triple stored on the board for every locked cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1)
/// - **South**: Rotated 180° (state 2)
/// - **West**: Rotated 90° counter-clockwise (state 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris3d_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate in the given direction
    pub fn rotate(&self, clockwise: bool) -> Self {
        if clockwise {
            self.rotate_cw()
        } else {
            self.rotate_ccw()
        }
    }

    /// Integer rotation state (0..=3)
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation state from an integer, taken mod 4
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }
}

/// Rotation axis for 3D pieces
///
/// - **X**: left to right
/// - **Y**: front to back
/// - **Z**: top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Discrete moves accepted by the 2D game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move2D {
    Left,
    Right,
    SoftDrop,
    HardDrop,
}

/// Discrete moves accepted by the 3D game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move3D {
    Left,
    Right,
    /// Toward the viewer (y - 1)
    Front,
    /// Away from the viewer (y + 1)
    Back,
    SoftDrop,
    HardDrop,
}

/// Actions an input device can request
///
/// Movement actions are "level" inputs (held, DAS-timed); everything else is an
/// "edge" input applied once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveFront,
    MoveBack,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    RotateXCw,
    RotateXCcw,
    RotateYCw,
    RotateYCcw,
    RotateZCw,
    RotateZCcw,
}

impl GameAction {
    pub const ALL: [GameAction; 15] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::MoveFront,
        GameAction::MoveBack,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Hold,
        GameAction::RotateXCw,
        GameAction::RotateXCcw,
        GameAction::RotateYCw,
        GameAction::RotateYCcw,
        GameAction::RotateZCw,
        GameAction::RotateZCcw,
    ];

    /// Parse action from its configuration name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris3d_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotatexcw"), Some(GameAction::RotateXCw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "movefront" => Some(GameAction::MoveFront),
            "moveback" => Some(GameAction::MoveBack),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "rotatexcw" => Some(GameAction::RotateXCw),
            "rotatexccw" => Some(GameAction::RotateXCcw),
            "rotateycw" => Some(GameAction::RotateYCw),
            "rotateyccw" => Some(GameAction::RotateYCcw),
            "rotatezcw" => Some(GameAction::RotateZCw),
            "rotatezccw" => Some(GameAction::RotateZCcw),
            _ => None,
        }
    }

    /// Convert to the camelCase configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveFront => "moveFront",
            GameAction::MoveBack => "moveBack",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::RotateXCw => "rotateXCw",
            GameAction::RotateXCcw => "rotateXCcw",
            GameAction::RotateYCw => "rotateYCw",
            GameAction::RotateYCcw => "rotateYCcw",
            GameAction::RotateZCw => "rotateZCw",
            GameAction::RotateZCcw => "rotateZCcw",
        }
    }

    /// 3D rotation axis and direction, if this is an axis rotation
    pub fn axis_rotation(&self) -> Option<(Axis, bool)> {
        match self {
            GameAction::RotateXCw => Some((Axis::X, true)),
            GameAction::RotateXCcw => Some((Axis::X, false)),
            GameAction::RotateYCw => Some((Axis::Y, true)),
            GameAction::RotateYCcw => Some((Axis::Y, false)),
            GameAction::RotateZCw => Some((Axis::Z, true)),
            GameAction::RotateZCcw => Some((Axis::Z, false)),
            _ => None,
        }
    }
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: 3+ corners occupied but not both front corners
/// - **Full**: 3+ corners occupied including both front corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Returns `None` for `TSpinKind::None`, `Some("mini")` / `Some("full")` otherwise.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }
}

/// Scoring policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringRule {
    /// NES-style line table with the bespoke first level transition
    #[default]
    Classic,
    /// Combo / back-to-back / T-spin aware scoring with drop points
    Modern,
}

impl ScoringRule {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "nes" => Some(ScoringRule::Classic),
            "modern" => Some(ScoringRule::Modern),
            _ => None,
        }
    }
}

/// Piece sequence policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceRule {
    /// Independent uniform sampling
    Uniform,
    /// Every 7 draws contain each kind exactly once
    #[default]
    SevenBag,
}

/// 2D rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// Super Rotation System with wall kicks
    #[default]
    Srs,
    /// Rotate in place, refuse when blocked
    Raw,
}

/// Core-side event emitted after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub score_delta: u64,
    pub tspin: TSpinKind,
    pub combo: u32,
    pub back_to_back: bool,
    pub all_clear: bool,
}
