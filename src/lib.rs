//! Duelsim - Two-Fighter Platform Arena Combat
//!
//! Two fighters move, jump, block and trade blows on a handful of static
//! platforms until one is knocked out or the round clock runs out. Either
//! fighter can be played from the keyboard or by the computer.
//!
//! This library exposes the simulation core and the bevy plugins for testing
//! and reuse.

pub mod camera;
pub mod cli;
pub mod combat;
pub mod duel;
pub mod headless;
pub mod keybindings;
pub mod settings;
pub mod ui;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use duel::{Arena, ArenaMap, ControlScheme, Duel, FighterId, InputIntent, MatchRules};
pub use headless::HeadlessMatchConfig;
