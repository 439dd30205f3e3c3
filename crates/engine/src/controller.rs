//! Frame drivers for the 2D and 3D games.
//!
//! A controller owns one match, its DAS timer and its key bindings, and is advanced
//! once per 60 Hz frame. Each frame runs in a fixed order:
//!
//! 1. held directions go through the DAS timer
//! 2. edge actions (rotations, hold) are applied
//! 3. a held soft drop moves the piece one cell; landing this way restarts the
//!    gravity count so the piece is not locked on the same frame
//! 4. a hard drop lands the piece and forces the gravity step
//! 5. every `fall_rate_frames(level)` frames the game steps
//!
//! Input is therefore always fully applied before the frame's gravity/lock step.

use std::path::Path;

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::core::{fall_rate_frames, Game2D, Game3D};
use crate::input::{FrameInput, InputTimer, KeyBindings, KeyCode};
use crate::types::{GameAction, Move2D, Move3D};

const DIRECTIONS_2D: [(GameAction, Move2D); 2] = [
    (GameAction::MoveLeft, Move2D::Left),
    (GameAction::MoveRight, Move2D::Right),
];

const DIRECTIONS_3D: [(GameAction, Move3D); 4] = [
    (GameAction::MoveLeft, Move3D::Left),
    (GameAction::MoveRight, Move3D::Right),
    (GameAction::MoveFront, Move3D::Front),
    (GameAction::MoveBack, Move3D::Back),
];

/// Frame counter that decides when gravity steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallClock {
    frames: u32,
}

impl FallClock {
    pub fn frames(&self) -> u32 {
        self.frames
    }

    fn tick(&mut self) {
        self.frames += 1;
    }

    fn reset(&mut self) {
        self.frames = 0;
    }

    /// Make the step due on this frame
    fn force(&mut self, level: u32) {
        self.frames = fall_rate_frames(level);
    }

    /// Consume the step if it is due
    fn take_due(&mut self, level: u32) -> bool {
        if self.frames >= fall_rate_frames(level) {
            self.frames = 0;
            true
        } else {
            false
        }
    }
}

fn held_directions<M: Copy, const N: usize>(
    table: &[(GameAction, M); N],
    input: &FrameInput,
) -> ArrayVec<M, N> {
    table
        .iter()
        .filter(|(action, _)| input.is_held(*action))
        .map(|&(_, mv)| mv)
        .collect()
}

fn log_game_over(mode: &str, level: u32, lines: u32, points: u64) {
    eprintln!(
        "[Engine] {} game over at level {}: {} lines, {} points",
        mode, level, lines, points
    );
}

/// Drives a 2D match
#[derive(Debug, Clone)]
pub struct Controller2D {
    game: Game2D,
    timer: InputTimer<Move2D>,
    bindings: KeyBindings,
    clock: FallClock,
}

impl Controller2D {
    pub fn new(config: &EngineConfig, bindings: KeyBindings) -> Self {
        let directions = DIRECTIONS_2D.map(|(_, mv)| mv);
        Self {
            game: Game2D::new(config.game),
            timer: InputTimer::with_config(&directions, config.das),
            bindings,
            clock: FallClock::default(),
        }
    }

    /// Build from a config, loading its bindings file or the default 2D layout
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let bindings = config.bindings_or(KeyBindings::default_2d())?;
        Ok(Self::new(config, bindings))
    }

    pub fn game(&self) -> &Game2D {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game2D {
        &mut self.game
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Re-read the bindings file; on error the current bindings stay active
    pub fn reload_bindings(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.bindings.reload(path)?;
        eprintln!("[Engine] key bindings reloaded from {}", path.display());
        Ok(())
    }

    pub fn clock(&self) -> FallClock {
        self.clock
    }

    /// Resolve raw key state through the bindings and play one frame
    pub fn play_keys(&mut self, pressed: &[KeyCode], held: &[KeyCode]) -> bool {
        let input = self.bindings.resolve(pressed, held);
        self.play_frame(&input)
    }

    /// Play one frame; returns `false` once the match is over
    pub fn play_frame(&mut self, input: &FrameInput) -> bool {
        if self.game.is_game_over() {
            return false;
        }

        self.clock.tick();
        self.apply_input(input);

        if !self.clock.take_due(self.game.level()) {
            return true;
        }
        let alive = self.game.step();
        if !alive {
            log_game_over("2D", self.game.level(), self.game.lines(), self.game.points());
        }
        alive
    }

    fn apply_input(&mut self, input: &FrameInput) {
        let held = held_directions(&DIRECTIONS_2D, input);
        let game = &mut self.game;
        self.timer.direction_input_handler(&held, |mv| game.try_move(mv));

        if input.is_pressed(GameAction::RotateCw) {
            self.game.try_rotate(true);
        }
        if input.is_pressed(GameAction::RotateCcw) {
            self.game.try_rotate(false);
        }
        if input.is_pressed(GameAction::Hold) {
            self.game.hold();
        }

        if input.is_held(GameAction::SoftDrop)
            && self.game.try_move(Move2D::SoftDrop)
            && self.game.landed()
        {
            self.clock.reset();
        }

        if input.is_pressed(GameAction::HardDrop) {
            self.game.try_move(Move2D::HardDrop);
            self.clock.force(self.game.level());
        }
    }

    /// Start a new match, keeping bindings and DAS delays
    pub fn restart(&mut self) {
        self.game.restart();
        self.timer.reset();
        self.clock.reset();
    }
}

/// Drives a 3D match
#[derive(Debug, Clone)]
pub struct Controller3D {
    game: Game3D,
    timer: InputTimer<Move3D>,
    bindings: KeyBindings,
    clock: FallClock,
}

impl Controller3D {
    pub fn new(config: &EngineConfig, bindings: KeyBindings) -> Self {
        let directions = DIRECTIONS_3D.map(|(_, mv)| mv);
        Self {
            game: Game3D::new(config.game),
            timer: InputTimer::with_config(&directions, config.das),
            bindings,
            clock: FallClock::default(),
        }
    }

    /// Build from a config, loading its bindings file or the default 3D layout
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let bindings = config.bindings_or(KeyBindings::default_3d())?;
        Ok(Self::new(config, bindings))
    }

    pub fn game(&self) -> &Game3D {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game3D {
        &mut self.game
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn reload_bindings(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.bindings.reload(path)?;
        eprintln!("[Engine] key bindings reloaded from {}", path.display());
        Ok(())
    }

    pub fn clock(&self) -> FallClock {
        self.clock
    }

    pub fn play_keys(&mut self, pressed: &[KeyCode], held: &[KeyCode]) -> bool {
        let input = self.bindings.resolve(pressed, held);
        self.play_frame(&input)
    }

    /// Play one frame; returns `false` once the match is over
    pub fn play_frame(&mut self, input: &FrameInput) -> bool {
        if self.game.is_game_over() {
            return false;
        }

        self.clock.tick();
        self.apply_input(input);

        if !self.clock.take_due(self.game.level()) {
            return true;
        }
        let alive = self.game.step();
        if !alive {
            log_game_over("3D", self.game.level(), self.game.floors(), self.game.points());
        }
        alive
    }

    fn apply_input(&mut self, input: &FrameInput) {
        let held = held_directions(&DIRECTIONS_3D, input);
        let game = &mut self.game;
        self.timer.direction_input_handler(&held, |mv| game.try_move(mv));

        for &action in &input.pressed {
            if let Some((axis, clockwise)) = action.axis_rotation() {
                self.game.try_rotate(axis, clockwise);
            }
        }

        if input.is_held(GameAction::SoftDrop)
            && self.game.try_move(Move3D::SoftDrop)
            && self.game.landed()
        {
            self.clock.reset();
        }

        if input.is_pressed(GameAction::HardDrop) {
            self.game.try_move(Move3D::HardDrop);
            self.clock.force(self.game.level());
        }
    }

    pub fn restart(&mut self) {
        self.game.restart();
        self.timer.reset();
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;

    fn controller_2d() -> Controller2D {
        Controller2D::new(&EngineConfig::default(), KeyBindings::default_2d())
    }

    fn held(actions: &[GameAction]) -> FrameInput {
        let mut input = FrameInput::default();
        input.held.extend(actions.iter().copied());
        input
    }

    fn pressed(actions: &[GameAction]) -> FrameInput {
        let mut input = FrameInput::default();
        input.pressed.extend(actions.iter().copied());
        input.held.extend(actions.iter().copied());
        input
    }

    #[test]
    fn test_gravity_cadence_level_zero() {
        let mut controller = controller_2d();
        let idle = FrameInput::default();
        let y = controller.game().active().y;

        for _ in 0..49 {
            assert!(controller.play_frame(&idle));
        }
        assert_eq!(controller.game().active().y, y);

        assert!(controller.play_frame(&idle));
        assert_eq!(controller.game().active().y, y + 1);
        assert_eq!(controller.clock().frames(), 0);
    }

    #[test]
    fn test_hard_drop_locks_on_the_same_frame() {
        let mut controller = controller_2d();
        assert!(controller.play_frame(&pressed(&[GameAction::HardDrop])));
        assert_eq!(controller.game().board().len(), 4);
        assert_eq!(controller.game().phase(), Phase::Falling);
    }

    #[test]
    fn test_held_direction_uses_das() {
        let mut controller = controller_2d();
        let x = controller.game().active().x;
        let left = held(&[GameAction::MoveLeft]);

        controller.play_frame(&left);
        assert_eq!(controller.game().active().x, x - 1);
        for _ in 1..15 {
            controller.play_frame(&left);
        }
        assert_eq!(controller.game().active().x, x - 1);
        controller.play_frame(&left);
        assert_eq!(controller.game().active().x, x - 2);
    }

    #[test]
    fn test_soft_drop_landing_restarts_gravity() {
        let mut controller = controller_2d();
        let down = held(&[GameAction::SoftDrop]);
        let mut frames = 0;
        while !controller.game().landed() {
            controller.play_frame(&down);
            frames += 1;
            assert!(frames < 30);
        }
        assert_eq!(controller.clock().frames(), 0);
        assert!(controller.game().board().is_empty());
    }

    #[test]
    fn test_3d_axis_rotation_from_keys() {
        let mut controller = Controller3D::new(&EngineConfig::default(), KeyBindings::default_3d());
        let before = *controller.game().active();
        assert!(controller.play_keys(&[KeyCode::Char('o')], &[KeyCode::Char('o')]));
        let after = *controller.game().active();
        if before.kind != crate::types::PieceKind::O {
            assert_ne!(after.cube, before.cube);
        }
        assert_eq!((after.x, after.y, after.z), (before.x, before.y, before.z));
    }
}
