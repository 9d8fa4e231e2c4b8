//! Keybinding system for remappable controls
//!
//! Two keyboard layouts drive the fighters (one per `ControlScheme`), plus a
//! handful of match-wide keys. Bindings are saved with the game settings.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::duel::{ControlScheme, InputIntent};

/// Match-wide actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    PausePlay,
    /// Put both fighters back on their spawns and refill the clock
    RestartRound,
    /// Start again from round one
    NewMatch,
}

impl GameAction {
    pub fn description(&self) -> &'static str {
        match self {
            GameAction::PausePlay => "Pause / Play",
            GameAction::RestartRound => "Restart Round",
            GameAction::NewMatch => "New Match",
        }
    }

    pub fn all() -> [GameAction; 3] {
        [
            GameAction::PausePlay,
            GameAction::RestartRound,
            GameAction::NewMatch,
        ]
    }
}

/// Per-fighter actions, one binding set per keyboard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterAction {
    MoveLeft,
    MoveRight,
    Jump,
    Block,
    Attack,
}

impl FighterAction {
    pub fn description(&self) -> &'static str {
        match self {
            FighterAction::MoveLeft => "Move Left",
            FighterAction::MoveRight => "Move Right",
            FighterAction::Jump => "Jump",
            FighterAction::Block => "Block",
            FighterAction::Attack => "Attack",
        }
    }

    pub fn all() -> [FighterAction; 5] {
        [
            FighterAction::MoveLeft,
            FighterAction::MoveRight,
            FighterAction::Jump,
            FighterAction::Block,
            FighterAction::Attack,
        ]
    }
}

/// Parse the `Debug` name of a supported key back into a `KeyCode`
fn parse_key_code(name: &str) -> Option<KeyCode> {
    let key = match name {
        "Escape" => KeyCode::Escape,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "KeyA" => KeyCode::KeyA,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyN" => KeyCode::KeyN,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyW" => KeyCode::KeyW,
        "Numpad0" => KeyCode::Numpad0,
        "Numpad1" => KeyCode::Numpad1,
        "NumpadEnter" => KeyCode::NumpadEnter,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    };
    Some(key)
}

/// Key binding with primary and optional secondary key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyBinding {
    #[serde(with = "keycode_serde")]
    pub primary: KeyCode,
    #[serde(default, with = "option_keycode_serde")]
    pub secondary: Option<KeyCode>,
}

mod keycode_serde {
    use super::*;
    use serde::{de::Error, Deserializer, Serializer};

    pub fn serialize<S>(key: &KeyCode, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:?}", key))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<KeyCode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        parse_key_code(&name).ok_or_else(|| D::Error::custom(format!("unsupported key '{}'", name)))
    }
}

mod option_keycode_serde {
    use super::*;
    use serde::{de::Error, Deserializer, Serializer};

    pub fn serialize<S>(key: &Option<KeyCode>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match key {
            Some(k) => serializer.serialize_some(&format!("{:?}", k)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<KeyCode>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name: Option<String> = Option::deserialize(deserializer)?;
        name.map(|name| {
            parse_key_code(&name)
                .ok_or_else(|| D::Error::custom(format!("unsupported key '{}'", name)))
        })
        .transpose()
    }
}

impl KeyBinding {
    pub fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    fn pressed(&self, keyboard: &ButtonInput<KeyCode>) -> bool {
        keyboard.pressed(self.primary) || self.secondary.is_some_and(|key| keyboard.pressed(key))
    }

    fn just_pressed(&self, keyboard: &ButtonInput<KeyCode>) -> bool {
        keyboard.just_pressed(self.primary)
            || self.secondary.is_some_and(|key| keyboard.just_pressed(key))
    }
}

/// Complete keybindings configuration
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Keybindings {
    game: HashMap<GameAction, KeyBinding>,
    /// WASD side of the keyboard
    primary: HashMap<FighterAction, KeyBinding>,
    /// Arrow keys side of the keyboard
    secondary: HashMap<FighterAction, KeyBinding>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::create_defaults()
    }
}

impl Keybindings {
    /// Create default keybindings
    pub fn create_defaults() -> Self {
        let game = HashMap::from([
            (
                GameAction::PausePlay,
                KeyBinding::with_secondary(KeyCode::Escape, KeyCode::KeyP),
            ),
            (GameAction::RestartRound, KeyBinding::new(KeyCode::KeyR)),
            (GameAction::NewMatch, KeyBinding::new(KeyCode::KeyN)),
        ]);

        let primary = HashMap::from([
            (FighterAction::MoveLeft, KeyBinding::new(KeyCode::KeyA)),
            (FighterAction::MoveRight, KeyBinding::new(KeyCode::KeyD)),
            (FighterAction::Jump, KeyBinding::new(KeyCode::KeyW)),
            (FighterAction::Block, KeyBinding::new(KeyCode::KeyS)),
            (FighterAction::Attack, KeyBinding::new(KeyCode::Space)),
        ]);

        let secondary = HashMap::from([
            (FighterAction::MoveLeft, KeyBinding::new(KeyCode::ArrowLeft)),
            (FighterAction::MoveRight, KeyBinding::new(KeyCode::ArrowRight)),
            (FighterAction::Jump, KeyBinding::new(KeyCode::ArrowUp)),
            (FighterAction::Block, KeyBinding::new(KeyCode::ArrowDown)),
            (
                FighterAction::Attack,
                KeyBinding::with_secondary(KeyCode::Enter, KeyCode::NumpadEnter),
            ),
        ]);

        Self {
            game,
            primary,
            secondary,
        }
    }

    /// Get the binding for a match-wide action
    pub fn get(&self, action: GameAction) -> Option<&KeyBinding> {
        self.game.get(&action)
    }

    /// Get the binding for a fighter action under a keyboard layout.
    /// The computer scheme has no keys.
    pub fn get_fighter(&self, scheme: ControlScheme, action: FighterAction) -> Option<&KeyBinding> {
        match scheme {
            ControlScheme::Primary => self.primary.get(&action),
            ControlScheme::Secondary => self.secondary.get(&action),
            ControlScheme::Computer => None,
        }
    }

    /// Check if an action was just pressed this frame
    pub fn action_just_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.get(action)
            .is_some_and(|binding| binding.just_pressed(keyboard))
    }

    fn fighter_pressed(
        &self,
        scheme: ControlScheme,
        action: FighterAction,
        keyboard: &ButtonInput<KeyCode>,
    ) -> bool {
        self.get_fighter(scheme, action)
            .is_some_and(|binding| binding.pressed(keyboard))
    }

    /// Build this frame's intent for a keyboard layout from held keys
    pub fn intent_for(&self, scheme: ControlScheme, keyboard: &ButtonInput<KeyCode>) -> InputIntent {
        InputIntent {
            move_left: self.fighter_pressed(scheme, FighterAction::MoveLeft, keyboard),
            move_right: self.fighter_pressed(scheme, FighterAction::MoveRight, keyboard),
            jump: self.fighter_pressed(scheme, FighterAction::Jump, keyboard),
            block: self.fighter_pressed(scheme, FighterAction::Block, keyboard),
            attack: self.fighter_pressed(scheme, FighterAction::Attack, keyboard),
        }
    }

    /// Get a human-readable string for a key
    pub fn key_name(key: KeyCode) -> &'static str {
        match key {
            KeyCode::Escape => "ESC",
            KeyCode::Enter => "ENTER",
            KeyCode::NumpadEnter => "NUM ENTER",
            KeyCode::Space => "SPACE",
            KeyCode::Tab => "TAB",
            KeyCode::Backspace => "BACKSPACE",
            KeyCode::ShiftLeft | KeyCode::ShiftRight => "SHIFT",
            KeyCode::ControlLeft | KeyCode::ControlRight => "CTRL",
            KeyCode::KeyA => "A",
            KeyCode::KeyD => "D",
            KeyCode::KeyE => "E",
            KeyCode::KeyF => "F",
            KeyCode::KeyJ => "J",
            KeyCode::KeyK => "K",
            KeyCode::KeyL => "L",
            KeyCode::KeyN => "N",
            KeyCode::KeyP => "P",
            KeyCode::KeyQ => "Q",
            KeyCode::KeyR => "R",
            KeyCode::KeyS => "S",
            KeyCode::KeyW => "W",
            KeyCode::Numpad0 => "NUM0",
            KeyCode::Numpad1 => "NUM1",
            KeyCode::ArrowUp => "↑",
            KeyCode::ArrowDown => "↓",
            KeyCode::ArrowLeft => "←",
            KeyCode::ArrowRight => "→",
            _ => "???",
        }
    }

    fn display(binding: Option<&KeyBinding>) -> String {
        match binding {
            Some(KeyBinding {
                primary,
                secondary: Some(secondary),
            }) => format!("{} / {}", Self::key_name(*primary), Self::key_name(*secondary)),
            Some(binding) => Self::key_name(binding.primary).to_string(),
            None => "Unbound".to_string(),
        }
    }

    /// Get display string for a match-wide binding
    pub fn binding_display(&self, action: GameAction) -> String {
        Self::display(self.get(action))
    }

    /// Get display string for a fighter binding
    pub fn fighter_binding_display(&self, scheme: ControlScheme, action: FighterAction) -> String {
        Self::display(self.get_fighter(scheme, action))
    }
}
