//! RNG module - deterministic piece sequences
//!
//! Two policies are supported:
//! - **Uniform**: every draw is an independent uniform sample over the 7 kinds
//! - **7-bag**: the sequence is made of shuffled bags of all 7 kinds, so any 7
//!   consecutive draws from a fresh randomizer contain each kind exactly once
//!
//! The 7-bag keeps a current FIFO plus a "next" bag. Every draw pops the FIFO and
//! transfers one piece from the next bag into it, so the lookahead is always full.
//!
//! All randomness comes from a small seeded LCG so sequences reproduce across
//! platforms.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::pieces::Spawn;
use crate::types::{PieceKind, PieceRule};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would be a fixed point
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Seeded piece generator with a fixed lookahead
#[derive(Debug, Clone)]
pub struct Randomizer {
    rule: PieceRule,
    rng: SimpleRng,
    /// Pieces visible to `peek` / `preview`, front is drawn next
    queue: VecDeque<PieceKind>,
    /// Remaining pieces of the following bag (7-bag only)
    next_bag: ArrayVec<PieceKind, 7>,
}

impl Randomizer {
    /// Create a randomizer with the default lookahead (one piece for uniform, a full
    /// bag for 7-bag)
    pub fn new(rule: PieceRule, seed: u32) -> Self {
        Self::with_lookahead(rule, seed, 1)
    }

    /// Create a randomizer; `lookahead` sizes the uniform queue (at least 1) and is
    /// ignored by the 7-bag, whose lookahead is always one bag
    pub fn with_lookahead(rule: PieceRule, seed: u32, lookahead: usize) -> Self {
        let mut randomizer = Self {
            rule,
            rng: SimpleRng::new(seed),
            queue: VecDeque::with_capacity(7),
            next_bag: ArrayVec::new(),
        };
        match rule {
            PieceRule::Uniform => {
                for _ in 0..lookahead.max(1) {
                    let kind = randomizer.sample();
                    randomizer.queue.push_back(kind);
                }
            }
            PieceRule::SevenBag => {
                let bag = randomizer.shuffled_bag();
                randomizer.queue.extend(bag);
                randomizer.next_bag = randomizer.shuffled_bag().into_iter().collect();
            }
        }
        randomizer
    }

    fn sample(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(7) as usize]
    }

    fn shuffled_bag(&mut self) -> [PieceKind; 7] {
        let mut bag = PieceKind::ALL;
        self.rng.shuffle(&mut bag);
        bag
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        match self.rule {
            PieceRule::Uniform => {
                let kind = match self.queue.pop_front() {
                    Some(kind) => kind,
                    None => self.sample(),
                };
                let refill = self.sample();
                self.queue.push_back(refill);
                kind
            }
            PieceRule::SevenBag => {
                if self.queue.is_empty() {
                    let bag = self.shuffled_bag();
                    self.queue.extend(bag);
                }
                let kind = match self.queue.pop_front() {
                    Some(kind) => kind,
                    None => self.sample(),
                };
                if self.next_bag.is_empty() {
                    self.next_bag = self.shuffled_bag().into_iter().collect();
                }
                if let Some(transfer) = self.next_bag.pop() {
                    self.queue.push_back(transfer);
                }
                kind
            }
        }
    }

    /// Draw the next kind as a spawn-positioned piece
    pub fn spawn_next<P: Spawn>(&mut self) -> P {
        P::spawn(self.draw())
    }

    /// Peek at the next kind without drawing it
    pub fn peek(&self) -> Option<PieceKind> {
        self.queue.front().copied()
    }

    /// Upcoming kinds in draw order
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    pub fn rule(&self) -> PieceRule {
        self.rule
    }

    /// Get the current RNG state (for restarting with a fresh sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new(PieceRule::SevenBag, 1)
    }
}
