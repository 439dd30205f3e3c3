//! 3D game state - one match in the 4 x 4 x 20 well
//!
//! Same lock cycle as the 2D game, with floors in place of rows: pieces move on the
//! x/y floor plane, fall along z and rotate a quarter turn about any axis. There is no
//! hold and no T-spin detection, and rotation never kicks.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::cube::Tetracube;
use crate::game_2d::Phase;
use crate::grid::{Board3D, Cell3, Piece, MAX_SPAN};
use crate::rng::Randomizer;
use crate::rotation::try_rotate_axis;
use crate::scoring::ScoreEngine;
use crate::types::{Axis, LockEvent, Move3D, PieceKind, TSpinKind};

/// Complete 3D match state
#[derive(Debug, Clone)]
pub struct Game3D {
    config: GameConfig,
    board: Board3D,
    active: Tetracube,
    next: Tetracube,
    randomizer: Randomizer,
    score: ScoreEngine,
    /// Floors cleared by the most recent step
    levels_cleared: u32,
    last_event: Option<LockEvent>,
    game_over: bool,
}

impl Game3D {
    pub fn new(config: GameConfig) -> Self {
        Self::from_board(config, Board3D::new())
    }

    pub fn with_seed(seed: u32) -> Self {
        Self::new(GameConfig::with_seed(seed))
    }

    /// Create a match on a prepared well
    pub fn from_board(config: GameConfig, board: Board3D) -> Self {
        let mut randomizer = Randomizer::new(config.piece_rule, config.seed);
        let active: Tetracube = randomizer.spawn_next();
        let next = randomizer.spawn_next();
        let game_over = active.overlaps_board(&board);

        Self {
            config,
            board,
            active,
            next,
            randomizer,
            score: ScoreEngine::new(config.scoring, config.start_level),
            levels_cleared: 0,
            last_event: None,
            game_over,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board3D {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board3D {
        &mut self.board
    }

    pub fn active(&self) -> &Tetracube {
        &self.active
    }

    pub fn next(&self) -> &Tetracube {
        &self.next
    }

    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.randomizer.preview()
    }

    pub fn score(&self) -> &ScoreEngine {
        &self.score
    }

    pub fn points(&self) -> u64 {
        self.score.points()
    }

    /// Floors cleared so far
    pub fn floors(&self) -> u32 {
        self.score.lines()
    }

    pub fn level(&self) -> u32 {
        self.score.level()
    }

    /// Floors cleared by the most recent `step()`
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

    pub fn occupied_cells(&self) -> ArrayVec<Cell3, 4> {
        self.active.occupied_cells()
    }

    pub fn landed(&self) -> bool {
        self.active.landed(&self.board)
    }

    /// Replace the active piece, if the replacement is a legal placement
    pub fn place_active(&mut self, piece: Tetracube) -> bool {
        if self.game_over || !piece.fits(&self.board) {
            return false;
        }
        self.active = piece;
        true
    }

    fn shift(&mut self, dx: i8, dy: i8, dz: i8) -> bool {
        let candidate = self.active.shifted(dx, dy, dz);
        if !candidate.fits(&self.board) {
            return false;
        }
        self.active = candidate;
        true
    }

    /// Apply one discrete move; returns whether the piece moved
    pub fn try_move(&mut self, mv: Move3D) -> bool {
        if self.game_over {
            return false;
        }

        match mv {
            Move3D::Left => self.shift(-1, 0, 0),
            Move3D::Right => self.shift(1, 0, 0),
            Move3D::Front => self.shift(0, -1, 0),
            Move3D::Back => self.shift(0, 1, 0),
            Move3D::SoftDrop => {
                if self.landed() {
                    return false;
                }
                let moved = self.shift(0, 0, 1);
                if moved {
                    self.score.on_soft_drop(1);
                }
                moved
            }
            Move3D::HardDrop => {
                let mut distance = 0u32;
                while !self.landed() && self.shift(0, 0, 1) {
                    distance += 1;
                }
                if distance > 0 {
                    self.score.on_hard_drop(distance);
                }
                distance > 0
            }
        }
    }

    /// Quarter-turn the active piece about `axis`
    pub fn try_rotate(&mut self, axis: Axis, clockwise: bool) -> bool {
        if self.game_over {
            return false;
        }
        try_rotate_axis(&mut self.active, &self.board, axis, clockwise)
    }

    /// Merge the active piece into the well under its color
    pub fn set_down(&mut self) {
        let color = self.active.color();
        for cell in self.active.occupied_cells() {
            self.board.insert(cell, color);
        }
    }

    /// Clear full floors spanned by `previous` (the piece that just locked)
    pub fn clear_floors(&mut self, previous: &Tetracube) -> ArrayVec<i8, MAX_SPAN> {
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
            self.shift(0, 0, 1);
            return true;
        }

        let previous = self.active;
        self.set_down();
        let cleared = self.clear_floors(&previous).len() as u32;
        let all_clear = cleared > 0 && self.board.is_empty();

        let result = self.score.on_clear(cleared, TSpinKind::None, all_clear);
        self.last_event = Some(LockEvent {
            lines_cleared: cleared,
            score_delta: result.total as u64,
            tspin: TSpinKind::None,
            combo: self.score.combo(),
            back_to_back: self.score.back_to_back(),
            all_clear,
        });

        self.active = self.next;
        self.next = self.randomizer.spawn_next();

        if self.active.overlaps_board(&self.board) {
            self.game_over = true;
            return false;
        }
        true
    }

    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Floor the active piece's anchor would land on after a hard drop
    pub fn ghost_z(&self) -> i8 {
        let mut ghost = self.active;
        while !ghost.landed(&self.board) {
            let lower = ghost.shifted(0, 0, 1);
            if !lower.fits(&self.board) {
                break;
            }
            ghost = lower;
        }
        ghost.z
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

impl Default for Game3D {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
