//! 2D game state - one match on the 10 x 20 board
//!
//! Ties together the board, catalog, rotation, randomizer and scoring. The match is
//! driven by two kinds of calls:
//! - input calls (`try_move`, `try_rotate`, `hold`) that validate and mutate the active
//!   piece, returning `false` on refusal without touching anything
//! - `step()`, called once per gravity cadence, which either shifts the piece down or
//!   locks it, clears lines, scores and spawns the next piece
//!
//! `step()` is the only place a match can end: a freshly spawned piece that overlaps
//! the board is game over, and every later call returns `false`.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::grid::{Board2D, Cell2, Piece, MAX_SPAN};
use crate::pieces::Tetromino;
use crate::rng::Randomizer;
use crate::rotation::{try_rotate_raw, try_rotate_srs, Kick};
use crate::scoring::ScoreEngine;
use crate::types::{LockEvent, Move2D, PieceKind, RotationMode, Rotation, TSpinKind};

/// Where the match is within the lock cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The active piece can still fall
    Falling,
    /// The active piece has landed and locks on the next step
    Locking,
    /// Terminal
    GameOver,
}

/// Complete 2D match state
#[derive(Debug, Clone)]
pub struct Game2D {
    config: GameConfig,
    board: Board2D,
    active: Tetromino,
    next: Tetromino,
    held: Option<PieceKind>,
    can_hold: bool,
    randomizer: Randomizer,
    score: ScoreEngine,
    /// Rows cleared by the most recent step
    levels_cleared: u32,
    /// Kick of the last successful action, if that action was a rotation
    last_rotation: Option<Kick>,
    last_event: Option<LockEvent>,
    game_over: bool,
}

impl Game2D {
    /// Create a new match on an empty board
    pub fn new(config: GameConfig) -> Self {
        Self::from_board(config, Board2D::new())
    }

    /// Create a new match with the default rules and the given RNG seed
    pub fn with_seed(seed: u32) -> Self {
        Self::new(GameConfig::with_seed(seed))
    }

    /// Create a match on a prepared board (garbage or puzzle setups)
    ///
    /// A first piece that overlaps the prepared board ends the match immediately.
    pub fn from_board(config: GameConfig, board: Board2D) -> Self {
        let mut randomizer = Randomizer::new(config.piece_rule, config.seed);
        let active: Tetromino = randomizer.spawn_next();
        let next: Tetromino = randomizer.spawn_next();
        let game_over = active.overlaps_board(&board);

        Self {
            config,
            board,
            active,
            next,
            held: None,
            can_hold: true,
            randomizer,
            score: ScoreEngine::new(config.scoring, config.start_level),
            levels_cleared: 0,
            last_rotation: None,
            last_event: None,
            game_over,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board2D {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board2D {
        &mut self.board
    }

    pub fn active(&self) -> &Tetromino {
        &self.active
    }

    pub fn next(&self) -> &Tetromino {
        &self.next
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Kinds after `next`, in draw order
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.randomizer.preview()
    }

    pub fn score(&self) -> &ScoreEngine {
        &self.score
    }

    pub fn points(&self) -> u64 {
        self.score.points()
    }

    pub fn lines(&self) -> u32 {
        self.score.lines()
    }

    pub fn level(&self) -> u32 {
        self.score.level()
    }

    /// Rows cleared by the most recent `step()`
    pub fn levels_cleared(&self) -> u32 {
        self.levels_cleared
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.landed() {
            Phase::Locking
        } else {
            Phase::Falling
        }
    }

    /// Cells of the active piece
    pub fn occupied_cells(&self) -> ArrayVec<Cell2, 4> {
        self.active.occupied_cells()
    }

    /// Whether the active piece rests on the floor or on the stack
    pub fn landed(&self) -> bool {
        self.active.landed(&self.board)
    }

    /// Replace the active piece, if the replacement is a legal placement
    pub fn place_active(&mut self, piece: Tetromino) -> bool {
        if self.game_over || !piece.fits(&self.board) {
            return false;
        }
        self.active = piece;
        self.last_rotation = None;
        true
    }

    fn shift(&mut self, dx: i8, dy: i8) -> bool {
        let candidate = self.active.shifted(dx, dy);
        if !candidate.fits(&self.board) {
            return false;
        }
        self.active = candidate;
        self.last_rotation = None;
        true
    }

    /// Apply one discrete move; returns whether the piece moved
    pub fn try_move(&mut self, mv: Move2D) -> bool {
        if self.game_over {
            return false;
        }

        match mv {
            Move2D::Left => self.shift(-1, 0),
            Move2D::Right => self.shift(1, 0),
            Move2D::SoftDrop => {
                if self.landed() {
                    return false;
                }
                let moved = self.shift(0, 1);
                if moved {
                    self.score.on_soft_drop(1);
                }
                moved
            }
            Move2D::HardDrop => {
                let mut distance = 0u32;
                while !self.landed() && self.shift(0, 1) {
                    distance += 1;
                }
                if distance > 0 {
                    self.score.on_hard_drop(distance);
                }
                distance > 0
            }
        }
    }

    /// Rotate the active piece per the configured rotation mode
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        if self.game_over {
            return false;
        }

        let kick = match self.config.rotation {
            RotationMode::Srs => try_rotate_srs(&mut self.active, &self.board, clockwise),
            RotationMode::Raw => {
                try_rotate_raw(&mut self.active, &self.board, clockwise).then_some(Kick::NONE)
            }
        };

        match kick {
            Some(kick) => {
                self.last_rotation = Some(kick);
                true
            }
            None => false,
        }
    }

    /// Swap the active piece with the held one (or the next piece on first use)
    ///
    /// Allowed once per piece. The incoming piece enters at the spawn anchor; the swap
    /// is refused if it would overlap the board.
    pub fn hold(&mut self) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }

        let incoming = match self.held {
            Some(kind) => Tetromino::new(kind),
            None => self.next,
        };
        if incoming.overlaps_board(&self.board) {
            return false;
        }

        if self.held.is_none() {
            self.next = self.randomizer.spawn_next();
        }
        self.held = Some(self.active.kind);
        self.active = incoming;
        self.can_hold = false;
        self.last_rotation = None;
        true
    }

    /// Merge the active piece into the board under its color
    pub fn set_down(&mut self) {
        let color = self.active.color();
        for cell in self.active.occupied_cells() {
            self.board.insert(cell, color);
        }
    }

    /// Clear full rows spanned by `previous` (the piece that just locked)
    pub fn clear_lines(&mut self, previous: &Tetromino) -> ArrayVec<i8, MAX_SPAN> {
        let cleared = match previous.vertical_span() {
            Some((top, bottom)) => self.board.clear_layers(top..=bottom),
            None => ArrayVec::new(),
        };
        self.levels_cleared = cleared.len() as u32;
        cleared
    }

    /// Advance one gravity step; returns `false` once the match is over
    pub fn step(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.levels_cleared = 0;

        if !self.landed() {
            self.shift(0, 1);
            return true;
        }

        self.lock();

        if self.active.overlaps_board(&self.board) {
            self.game_over = true;
            return false;
        }
        true
    }

    fn lock(&mut self) {
        let previous = self.active;
        let tspin = self.t_spin_kind(&previous);

        self.set_down();
        let cleared = self.clear_lines(&previous).len() as u32;
        let all_clear = cleared > 0 && self.board.is_empty();

        let result = self.score.on_clear(cleared, tspin, all_clear);
        self.last_event = Some(LockEvent {
            lines_cleared: cleared,
            score_delta: result.total as u64,
            tspin,
            combo: self.score.combo(),
            back_to_back: self.score.back_to_back(),
            all_clear,
        });

        self.active = self.next;
        self.next = self.randomizer.spawn_next();
        self.can_hold = true;
        self.last_rotation = None;
    }

    /// Take and clear the last lock event
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Classify a T-spin with the 3-corner rule
    ///
    /// Only a T whose last successful action was a rotation qualifies. Out-of-bounds
    /// corners count as occupied. Both front corners (the side the T points to) make a
    /// full T-spin, as does a rotation that needed the last kick; anything else is mini.
    fn t_spin_kind(&self, piece: &Tetromino) -> TSpinKind {
        if piece.kind != PieceKind::T {
            return TSpinKind::None;
        }
        let Some(kick) = self.last_rotation else {
            return TSpinKind::None;
        };

        let blocked = |&(cx, cy): &(i8, i8)| !self.board.is_free((piece.x + cx, piece.y + cy));

        let corners: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];
        if corners.iter().filter(|c| blocked(c)).count() < 3 {
            return TSpinKind::None;
        }

        let front: [(i8, i8); 2] = match piece.rotation {
            Rotation::North => [(0, 0), (2, 0)],
            Rotation::East => [(2, 0), (2, 2)],
            Rotation::South => [(0, 2), (2, 2)],
            Rotation::West => [(0, 0), (0, 2)],
        };

        if front.iter().all(blocked) || kick.index == 4 {
            TSpinKind::Full
        } else {
            TSpinKind::Mini
        }
    }

    /// Row the active piece's anchor would land on after a hard drop
    pub fn ghost_y(&self) -> i8 {
        let mut ghost = self.active;
        while !ghost.landed(&self.board) {
            let lower = ghost.shifted(0, 1);
            if !lower.fits(&self.board) {
                break;
            }
            ghost = lower;
        }
        ghost.y
    }

    /// Start a fresh match with the same rules, continuing the RNG stream
    pub fn restart(&mut self) {
        let config = GameConfig {
            seed: self.randomizer.seed(),
            ..self.config
        };
        *self = Self::new(config);
    }
}

impl Default for Game2D {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
