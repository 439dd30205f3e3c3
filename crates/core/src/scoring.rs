//! Scoring module - Classic and Modern scoring rules
//!
//! Two interchangeable policies:
//! - **Classic** (NES): line table scaled by `level + 1`. The first level-up happens
//!   when cumulative lines reach `(start_level + 1) * 10`; after that transition every
//!   multiple of 10 crossed raises the level.
//! - **Modern**: line or T-spin table scaled by `level + 1`, a 3/2 back-to-back
//!   multiplier, a combo bonus and drop points.
//!
//! [`ScoreEngine`] wraps either policy behind one interface so the game state never
//! needs to know which one is active.

use crate::types::{
    ScoringRule, TSpinKind, ALL_CLEAR_MULTIPLIER, B2B_DENOMINATOR, B2B_NUMERATOR,
    CLASSIC_LINE_SCORES, COMBO_BASE, FULL_TSPIN_BASE, FULL_TSPIN_PER_LINE, HARD_DROP_POINTS,
    MINI_TSPIN_BASE, MODERN_LINE_SCORES, SOFT_DROP_POINTS,
};

/// Score calculation result for one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Table points scaled by level, before any multiplier
    pub base: u32,
    /// Base points after the B2B and all-clear multipliers, excluding combo bonus
    pub line_clear_score: u32,
    /// Combo bonus added on top of `line_clear_score`
    pub combo_bonus: u32,
    pub total: u32,
    /// Whether this clear keeps (or starts) a back-to-back chain
    pub qualifies_for_b2b: bool,
    /// Whether a B2B multiplier was applied to this clear
    pub b2b_applied: bool,
}

/// Classic line clear points
/// lines: number of lines cleared (0-4)
/// level: current level (0-based)
pub fn classic_line_score(lines: u32, level: u32) -> u32 {
    let Some(&base) = CLASSIC_LINE_SCORES.get(lines as usize) else {
        return 0;
    };
    base.saturating_mul(level.saturating_add(1))
}

/// Modern table points before the level multiplier
pub fn modern_base_score(tspin: TSpinKind, lines: u32) -> u32 {
    let lines = lines.min(4);
    match tspin {
        TSpinKind::None => MODERN_LINE_SCORES[lines as usize],
        TSpinKind::Mini => MINI_TSPIN_BASE << lines,
        TSpinKind::Full => FULL_TSPIN_BASE + FULL_TSPIN_PER_LINE * lines,
    }
}

/// Check if this clear qualifies for back-to-back
/// B2B applies to: four lines, or any T-spin that clears at least one line
pub fn qualifies_for_b2b(tspin: TSpinKind, lines: u32) -> bool {
    lines >= 4 || (tspin != TSpinKind::None && lines >= 1)
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Combo bonus for a clear made with `combo` previous consecutive clears
pub fn combo_bonus(combo: u32, level: u32) -> u32 {
    COMBO_BASE.saturating_mul(combo).saturating_mul(level)
}

/// Frames between gravity steps at a level
///
/// `floor(49 / 1.1^level) + 1`, so level 0 falls every 50 frames and the rate
/// bottoms out at one step per frame.
pub fn fall_rate_frames(level: u32) -> u32 {
    let exponent = level.min(i32::MAX as u32) as i32;
    (49.0 / 1.1f64.powi(exponent)) as u32 + 1
}

/// NES-style score
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassicScore {
    pub points: u64,
    pub lines: u32,
    pub level: u32,
    /// Set once the first (bespoke) level threshold has been passed
    pub transitioned: bool,
}

impl ClassicScore {
    pub fn new(start_level: u32) -> Self {
        Self {
            level: start_level,
            ..Self::default()
        }
    }

    /// Record a lock that cleared `cleared` lines (0-4); returns the points added
    pub fn score(&mut self, cleared: u32) -> u32 {
        let cleared = cleared.min(4);
        let gained = classic_line_score(cleared, self.level);
        self.points = self.points.saturating_add(gained as u64);

        let next_lines = self.lines.saturating_add(cleared);
        let threshold = self.level.saturating_add(1).saturating_mul(10);
        if self.transitioned && next_lines / 10 > self.lines / 10 {
            self.level = self.level.saturating_add(1);
        } else if self.lines < threshold && threshold <= next_lines {
            self.level = self.level.saturating_add(1);
            self.transitioned = true;
        }
        self.lines = next_lines;

        gained
    }
}

/// Combo / back-to-back / T-spin aware score
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModernScore {
    pub points: u64,
    pub lines: u32,
    pub level: u32,
    pub start_level: u32,
    /// Set by the last lock if it was a four-line clear or a line-clearing T-spin
    pub back_to_back: bool,
    /// Consecutive line-clearing locks so far
    pub combo_count: u32,
}

impl ModernScore {
    pub fn new(start_level: u32) -> Self {
        Self {
            level: start_level,
            start_level,
            ..Self::default()
        }
    }

    /// Points for cells moved by a soft drop
    pub fn soft_drop(&mut self, cells: u32) -> u32 {
        let gained = cells.saturating_mul(SOFT_DROP_POINTS);
        self.points = self.points.saturating_add(gained as u64);
        gained
    }

    /// Points for cells moved by a hard drop
    pub fn hard_drop(&mut self, cells: u32) -> u32 {
        let gained = cells.saturating_mul(HARD_DROP_POINTS);
        self.points = self.points.saturating_add(gained as u64);
        gained
    }

    /// Score a lock
    ///
    /// Every lock sets the back-to-back flag for the next one, so a zero-line lock
    /// clears it. A zero-line T-spin still scores its table points, with the
    /// multiplier if the previous lock set the flag, but breaks the combo.
    pub fn clear(&mut self, cleared: u32, tspin: TSpinKind, all_clear: bool) -> ScoreResult {
        let cleared = cleared.min(4);
        let multiplier = self.level.saturating_add(1);
        let base = modern_base_score(tspin, cleared).saturating_mul(multiplier);

        let b2b_applied = self.back_to_back;
        let mut line_clear_score = if b2b_applied {
            apply_b2b_multiplier(base)
        } else {
            base
        };
        if all_clear {
            line_clear_score = line_clear_score.saturating_mul(ALL_CLEAR_MULTIPLIER);
        }

        let qualifies = qualifies_for_b2b(tspin, cleared);
        self.back_to_back = qualifies;
        let combo_bonus = if cleared > 0 {
            let bonus = combo_bonus(self.combo_count, self.level);
            self.combo_count = self.combo_count.saturating_add(1);
            bonus
        } else {
            self.combo_count = 0;
            0
        };

        let total = line_clear_score.saturating_add(combo_bonus);
        self.points = self.points.saturating_add(total as u64);
        self.lines = self.lines.saturating_add(cleared);
        self.level = self.level.max(self.start_level.saturating_add(self.lines / 10));

        ScoreResult {
            base,
            line_clear_score,
            combo_bonus,
            total,
            qualifies_for_b2b: qualifies,
            b2b_applied,
        }
    }
}

/// The active scoring policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEngine {
    Classic(ClassicScore),
    Modern(ModernScore),
}

impl ScoreEngine {
    pub fn new(rule: ScoringRule, start_level: u32) -> Self {
        match rule {
            ScoringRule::Classic => ScoreEngine::Classic(ClassicScore::new(start_level)),
            ScoringRule::Modern => ScoreEngine::Modern(ModernScore::new(start_level)),
        }
    }

    pub fn rule(&self) -> ScoringRule {
        match self {
            ScoreEngine::Classic(_) => ScoringRule::Classic,
            ScoreEngine::Modern(_) => ScoringRule::Modern,
        }
    }

    /// Score a lock. Classic scoring ignores the T-spin and all-clear flags.
    pub fn on_clear(&mut self, cleared: u32, tspin: TSpinKind, all_clear: bool) -> ScoreResult {
        match self {
            ScoreEngine::Classic(score) => {
                let gained = score.score(cleared);
                ScoreResult {
                    base: gained,
                    line_clear_score: gained,
                    total: gained,
                    ..ScoreResult::default()
                }
            }
            ScoreEngine::Modern(score) => score.clear(cleared, tspin, all_clear),
        }
    }

    /// Soft drop distance event; classic scoring awards nothing
    pub fn on_soft_drop(&mut self, cells: u32) -> u32 {
        match self {
            ScoreEngine::Classic(_) => 0,
            ScoreEngine::Modern(score) => score.soft_drop(cells),
        }
    }

    /// Hard drop distance event; classic scoring awards nothing
    pub fn on_hard_drop(&mut self, cells: u32) -> u32 {
        match self {
            ScoreEngine::Classic(_) => 0,
            ScoreEngine::Modern(score) => score.hard_drop(cells),
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            ScoreEngine::Classic(score) => score.points,
            ScoreEngine::Modern(score) => score.points,
        }
    }

    pub fn lines(&self) -> u32 {
        match self {
            ScoreEngine::Classic(score) => score.lines,
            ScoreEngine::Modern(score) => score.lines,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            ScoreEngine::Classic(score) => score.level,
            ScoreEngine::Modern(score) => score.level,
        }
    }

    /// Back-to-back flag (always false under classic scoring)
    pub fn back_to_back(&self) -> bool {
        matches!(self, ScoreEngine::Modern(score) if score.back_to_back)
    }

    /// Current combo count (always 0 under classic scoring)
    pub fn combo(&self) -> u32 {
        match self {
            ScoreEngine::Classic(_) => 0,
            ScoreEngine::Modern(score) => score.combo_count,
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(ScoringRule::default(), 0)
    }
}
