//! Combat reporting
//!
//! Consumes what the duel driver publishes each frame:
//! - Bevy events for hits, landings and match flow
//! - The combat log resource and its JSON export

use bevy::prelude::*;

pub mod events;
pub mod log;

use crate::duel::systems::DuelSystemPhase;
use crate::duel::Duel;
use self::events::*;
use self::log::{CombatLog, CombatLogEventType};

/// Plugin for the combat log. Requires the core duel systems.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatLog>()
            .add_systems(Startup, start_combat_log)
            .add_systems(
                Update,
                record_combat_log.in_set(DuelSystemPhase::Resolution),
            );
    }
}

fn start_combat_log(mut combat_log: ResMut<CombatLog>) {
    combat_log.clear();
    combat_log.log(CombatLogEventType::MatchEvent, "Match started".to_string());
    combat_log.log(CombatLogEventType::RoundStart, "Round 1 begins".to_string());
}

/// Copy this frame's duel events into the combat log.
pub fn record_combat_log(
    duel: Res<Duel>,
    mut combat_log: ResMut<CombatLog>,
    mut hit_events: EventReader<FighterHitEvent>,
    mut round_events: EventReader<RoundEndedEvent>,
    mut flow_events: EventReader<MatchFlowEvent>,
) {
    combat_log.match_time = duel.now_ms() / 1000.0;

    // Flow events come from the input phase, ahead of this frame's tick
    for event in flow_events.read() {
        match event {
            MatchFlowEvent::RoundStarted { round } => combat_log.log(
                CombatLogEventType::RoundStart,
                format!("Round {} begins", round),
            ),
            MatchFlowEvent::Paused => {
                combat_log.log(CombatLogEventType::Pause, "Paused".to_string())
            }
            MatchFlowEvent::Resumed => {
                combat_log.log(CombatLogEventType::Pause, "Resumed".to_string())
            }
            MatchFlowEvent::Restarted => combat_log.start_new_match(),
        }
    }

    for event in hit_events.read() {
        combat_log.log_hit(&event.hit);
    }

    for event in round_events.read() {
        combat_log.log_round_end(&event.outcome);
    }
}
