//! Driver configuration
//!
//! `EngineConfig` bundles the match rules, DAS delays and an optional key-bindings
//! file. It can be read from JSON and overridden from the environment:
//!
//! | variable | field |
//! |----------|-------|
//! | `TETRIS3D_SEED` | `game.seed` |
//! | `TETRIS3D_LEVEL` | `game.start_level` |
//! | `TETRIS3D_SCORING` | `game.scoring` (`classic` / `nes` / `modern`) |
//! | `TETRIS3D_BINDINGS` | `bindings_path` |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::GameConfig;
use crate::input::{DasConfig, KeyBindings};
use crate::types::ScoringRule;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub game: GameConfig,
    pub das: DasConfig,
    /// JSON key-bindings file; the mode's default layout is used when unset
    pub bindings_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup; unparsable values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup("TETRIS3D_SEED").and_then(|s| s.trim().parse().ok()) {
            self.game.seed = seed;
        }
        if let Some(level) = lookup("TETRIS3D_LEVEL").and_then(|s| s.trim().parse().ok()) {
            self.game.start_level = level;
        }
        if let Some(rule) = lookup("TETRIS3D_SCORING").and_then(|s| ScoringRule::from_str(s.trim())) {
            self.game.scoring = rule;
        }
        if let Some(path) = lookup("TETRIS3D_BINDINGS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            self.bindings_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid engine config in {}", path.display()))
    }

    /// Bindings from `bindings_path`, or `fallback` when no file is configured
    pub fn bindings_or(&self, fallback: KeyBindings) -> anyhow::Result<KeyBindings> {
        match &self.bindings_path {
            Some(path) => KeyBindings::load(path),
            None => Ok(fallback),
        }
    }
}
