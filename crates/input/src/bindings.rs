//! Configurable key bindings.
//!
//! Bindings map each [`GameAction`] to a list of `crossterm` key codes. They are
//! stored as JSON keyed by the camelCase action name:
//!
//! ```json
//! { "moveLeft": ["a", "left"], "hardDrop": ["space"] }
//! ```
//!
//! Key names are case-insensitive: single characters, `space`, arrow names, `enter`,
//! `tab`, `esc`, `backspace`, `shift`, `ctrl`, `alt` and `f1`..`f12`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, ModifierKeyCode};

use crate::types::GameAction;

/// Enough room for every action at once
const ACTION_CAPACITY: usize = 16;

/// Errors raised while parsing a bindings document
#[derive(Debug, thiserror::Error)]
pub enum BindingsError {
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("unknown key {key:?} bound to {action}")]
    UnknownKey { action: String, key: String },
    #[error("invalid bindings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a configuration key name
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let lower = name.trim().to_lowercase();
    let code = match lower.as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "shift" | "lshift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
        "rshift" => KeyCode::Modifier(ModifierKeyCode::RightShift),
        "ctrl" | "lctrl" => KeyCode::Modifier(ModifierKeyCode::LeftControl),
        "rctrl" => KeyCode::Modifier(ModifierKeyCode::RightControl),
        "alt" | "lalt" => KeyCode::Modifier(ModifierKeyCode::LeftAlt),
        "ralt" => KeyCode::Modifier(ModifierKeyCode::RightAlt),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => {
                    let n = other.strip_prefix('f')?.parse::<u8>().ok()?;
                    if !(1..=12).contains(&n) {
                        return None;
                    }
                    KeyCode::F(n)
                }
            }
        }
    };
    Some(code)
}

/// Configuration name of a key code, if it has one
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => return Some(c.to_lowercase().collect()),
        KeyCode::F(n) => return Some(format!("f{n}")),
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Enter => "enter",
        KeyCode::Tab => "tab",
        KeyCode::Esc => "esc",
        KeyCode::Backspace => "backspace",
        KeyCode::Modifier(ModifierKeyCode::LeftShift) => "shift",
        KeyCode::Modifier(ModifierKeyCode::RightShift) => "rshift",
        KeyCode::Modifier(ModifierKeyCode::LeftControl) => "ctrl",
        KeyCode::Modifier(ModifierKeyCode::RightControl) => "rctrl",
        KeyCode::Modifier(ModifierKeyCode::LeftAlt) => "alt",
        KeyCode::Modifier(ModifierKeyCode::RightAlt) => "ralt",
        _ => return None,
    };
    Some(name.to_string())
}

/// Letters match regardless of case
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Actions requested during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Edge actions: a bound key went down this frame
    pub pressed: ArrayVec<GameAction, ACTION_CAPACITY>,
    /// Level actions: a bound key is down this frame
    pub held: ArrayVec<GameAction, ACTION_CAPACITY>,
}

impl FrameInput {
    pub fn is_pressed(&self, action: GameAction) -> bool {
        self.pressed.contains(&action)
    }

    pub fn is_held(&self, action: GameAction) -> bool {
        self.held.contains(&action)
    }
}

/// Action to key-code configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyBindings {
    map: BTreeMap<GameAction, Vec<KeyCode>>,
}

impl KeyBindings {
    fn from_names(pairs: &[(GameAction, &[&str])]) -> Self {
        let map = pairs
            .iter()
            .map(|&(action, names)| {
                let keys = names.iter().filter_map(|name| parse_key(name)).collect();
                (action, keys)
            })
            .collect();
        Self { map }
    }

    /// Default 2D layout
    pub fn default_2d() -> Self {
        Self::from_names(&[
            (GameAction::MoveLeft, &["a", "left"]),
            (GameAction::MoveRight, &["d", "right"]),
            (GameAction::SoftDrop, &["s", "shift", "down"]),
            (GameAction::HardDrop, &["space"]),
            (GameAction::RotateCw, &["o", "up"]),
            (GameAction::RotateCcw, &["u"]),
            (GameAction::Hold, &["c"]),
        ])
    }

    /// Default 3D layout
    pub fn default_3d() -> Self {
        Self::from_names(&[
            (GameAction::MoveLeft, &["a", "left"]),
            (GameAction::MoveRight, &["d", "right"]),
            (GameAction::MoveFront, &["s", "down"]),
            (GameAction::MoveBack, &["w", "up"]),
            (GameAction::SoftDrop, &["shift"]),
            (GameAction::HardDrop, &["space"]),
            (GameAction::RotateYCcw, &["u"]),
            (GameAction::RotateYCw, &["o"]),
            (GameAction::RotateXCw, &["i"]),
            (GameAction::RotateXCcw, &["k"]),
            (GameAction::RotateZCw, &["j"]),
            (GameAction::RotateZCcw, &["l"]),
        ])
    }

    /// Parse a JSON bindings document
    ///
    /// The document replaces the whole configuration: actions it does not mention are
    /// left unbound.
    pub fn from_json_str(json: &str) -> Result<Self, BindingsError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut map = BTreeMap::new();
        for (name, keys) in raw {
            let action = GameAction::from_str(&name)
                .ok_or_else(|| BindingsError::UnknownAction(name.clone()))?;
            let codes = keys
                .iter()
                .map(|key| {
                    parse_key(key).ok_or_else(|| BindingsError::UnknownKey {
                        action: name.clone(),
                        key: key.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            map.insert(action, codes);
        }
        Ok(Self { map })
    }

    /// Serialize to the JSON document format
    pub fn to_json_string(&self) -> Result<String, BindingsError> {
        let raw: BTreeMap<&str, Vec<String>> = self
            .map
            .iter()
            .map(|(action, keys)| {
                let names = keys.iter().filter_map(|&code| key_name(code)).collect();
                (action.as_str(), names)
            })
            .collect();
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    /// Load bindings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read key bindings from {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("invalid key bindings in {}", path.display()))
    }

    /// Write bindings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        fs::write(path, text)
            .with_context(|| format!("failed to write key bindings to {}", path.display()))
    }

    /// Re-read the file in place; on error the current bindings are kept
    pub fn reload(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Keys bound to an action
    pub fn keys_for(&self, action: GameAction) -> &[KeyCode] {
        self.map.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Actions bound to a key
    pub fn actions_for(&self, code: KeyCode) -> impl Iterator<Item = GameAction> + '_ {
        let code = normalize(code);
        self.map
            .iter()
            .filter(move |(_, keys)| keys.contains(&code))
            .map(|(&action, _)| action)
    }

    /// Replace the keys of one action
    pub fn bind(&mut self, action: GameAction, keys: impl IntoIterator<Item = KeyCode>) {
        let keys = keys.into_iter().map(normalize).collect();
        self.map.insert(action, keys);
    }

    /// Resolve this frame's key state into actions
    ///
    /// `pressed` are keys that went down this frame, `held` are keys that are down.
    /// Actions come out in declaration order, each at most once.
    pub fn resolve(&self, pressed: &[KeyCode], held: &[KeyCode]) -> FrameInput {
        let bound = |action: GameAction, codes: &[KeyCode]| {
            self.keys_for(action)
                .iter()
                .any(|key| codes.iter().any(|&code| normalize(code) == *key))
        };

        let mut input = FrameInput::default();
        for action in GameAction::ALL {
            if bound(action, pressed) {
                let _ = input.pressed.try_push(action);
            }
            if bound(action, held) {
                let _ = input.held.try_push(action);
            }
        }
        input
    }
}
