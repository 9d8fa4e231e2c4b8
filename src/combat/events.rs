//! Combat events
//!
//! Bevy events emitted by the duel driver for the combat log and visual
//! effects. They carry copies of core data; nothing here feeds back into the
//! simulation.

use bevy::prelude::*;

use crate::duel::{FighterId, HitEvent, RoundOutcome};

/// Event fired when an attack connects (blocked or not)
#[derive(Event, Debug, Clone, Copy)]
pub struct FighterHitEvent {
    pub hit: HitEvent,
}

/// Event fired when a fighter touches down on a platform
#[derive(Event, Debug, Clone, Copy)]
pub struct FighterLandedEvent {
    pub fighter: FighterId,
    /// Feet position (body center x, platform top y)
    pub x: f32,
    pub y: f32,
}

/// Event fired when a round ends, including the round that decides the match
#[derive(Event, Debug, Clone, Copy)]
pub struct RoundEndedEvent {
    pub outcome: RoundOutcome,
}

/// Match flow changes that did not come out of the simulation itself
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFlowEvent {
    RoundStarted { round: u32 },
    Paused,
    Resumed,
    /// A fresh match was started (round one, no wins)
    Restarted,
}
