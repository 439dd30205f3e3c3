//! Frame-counted DAS (delayed auto shift) timer.
//!
//! Each tracked direction owns a small state machine driven once per frame:
//!
//! - On the first held frame the move fires immediately. If the piece cannot move,
//!   the instant move stays pending and is retried on every following frame.
//! - After the instant move, the next move fires once `first_delay` frames have been
//!   charged, then every `second_delay` frames while the key stays held.
//! - Releasing the direction resets its charge and re-arms the instant move.
//!
//! With the default 15/6 delays an unobstructed held direction moves on frames
//! 0, 15, 21, 27, 33, ...

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{FIRST_DELAY, SECOND_DELAY};

/// Directions a single timer can track
pub const MAX_DIRECTIONS: usize = 8;

/// Frame delays for auto-repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DasConfig {
    /// Frames between the instant move and the first repeat
    pub first_delay: u32,
    /// Frames between repeats
    pub second_delay: u32,
}

impl Default for DasConfig {
    fn default() -> Self {
        Self {
            first_delay: FIRST_DELAY,
            second_delay: SECOND_DELAY,
        }
    }
}

/// Timing state of one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DasState {
    /// Frames charged since the last move (or since the key went down)
    pub charge: u32,
    /// The instant move for this press has not happened yet
    pub first_move_pending: bool,
    /// The first delay has elapsed; repeats use the second delay
    pub repeating: bool,
}

impl DasState {
    const RELEASED: DasState = DasState {
        charge: 0,
        first_move_pending: true,
        repeating: false,
    };
}

impl Default for DasState {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// Per-direction DAS timers
#[derive(Debug, Clone)]
pub struct InputTimer<D> {
    config: DasConfig,
    states: ArrayVec<(D, DasState), MAX_DIRECTIONS>,
}

impl<D: Copy + Eq> InputTimer<D> {
    /// Track `directions` with the default delays
    pub fn new(directions: &[D]) -> Self {
        Self::with_config(directions, DasConfig::default())
    }

    /// Track `directions` with custom delays; directions past `MAX_DIRECTIONS` are ignored
    pub fn with_config(directions: &[D], config: DasConfig) -> Self {
        let mut states = ArrayVec::new();
        for &direction in directions {
            if states.iter().any(|&(d, _)| d == direction) {
                continue;
            }
            if states.try_push((direction, DasState::RELEASED)).is_err() {
                break;
            }
        }
        Self { config, states }
    }

    pub fn config(&self) -> DasConfig {
        self.config
    }

    /// Change the delays; charges in progress are kept
    pub fn set_config(&mut self, config: DasConfig) {
        self.config = config;
    }

    /// Current state of a tracked direction
    pub fn state(&self, direction: D) -> Option<DasState> {
        self.states
            .iter()
            .find(|&&(d, _)| d == direction)
            .map(|&(_, state)| state)
    }

    /// Release every direction
    pub fn reset(&mut self) {
        for (_, state) in &mut self.states {
            *state = DasState::RELEASED;
        }
    }

    /// Advance one frame
    ///
    /// `held` lists the directions held this frame. `perform` is called for every move
    /// that is due and returns whether the piece actually moved. Returns true if any
    /// move was performed.
    ///
    /// A refused instant move is not dropped: it is retried on every frame until it
    /// succeeds, instead of being attempted once and then waiting out `first_delay`.
    /// Once a retry lands, the `first_delay` count starts from that frame. After a
    /// whole `first_delay` of refusals the direction falls back to plain repeating.
    pub fn direction_input_handler<F>(&mut self, held: &[D], mut perform: F) -> bool
    where
        F: FnMut(D) -> bool,
    {
        let DasConfig {
            first_delay,
            second_delay,
        } = self.config;
        let mut fired = false;

        for (direction, state) in &mut self.states {
            if !held.contains(direction) {
                *state = DasState::RELEASED;
                continue;
            }

            state.charge += 1;

            if state.first_move_pending {
                if perform(*direction) {
                    fired = true;
                    state.first_move_pending = false;
                    state.charge = 0;
                } else if state.charge > first_delay {
                    // Blocked for a whole first delay: fall back to plain repeating
                    state.first_move_pending = false;
                    state.repeating = true;
                    state.charge = 0;
                }
                continue;
            }

            let delay = if state.repeating {
                second_delay
            } else {
                first_delay
            };
            if state.charge >= delay {
                fired |= perform(*direction);
                state.charge = 0;
                state.repeating = true;
            }
        }

        fired
    }
}
