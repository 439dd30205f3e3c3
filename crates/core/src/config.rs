//! Per-match configuration

use serde::{Deserialize, Serialize};

use crate::types::{PieceRule, RotationMode, ScoringRule};

/// Rules and seed for one match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u32,
    pub start_level: u32,
    pub piece_rule: PieceRule,
    pub scoring: ScoringRule,
    /// 2D only; 3D rotation never kicks
    pub rotation: RotationMode,
}

impl GameConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            start_level: 0,
            piece_rule: PieceRule::SevenBag,
            scoring: ScoringRule::Classic,
            rotation: RotationMode::Srs,
        }
    }
}
