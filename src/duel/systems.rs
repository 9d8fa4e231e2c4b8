//! Duel Systems API
//!
//! Bevy systems that drive a `Duel` resource once per frame. Windowed and
//! headless modes both build on `add_core_duel_systems`; keyboard handling is
//! added on top only when a window exists.
//!
//! ## System Phases
//!
//! 1. **Input** - keyboard intents and match controls
//! 2. **Simulation** - the single `Duel::tick` of the frame
//! 3. **Resolution** - round intermission and anything reacting to the tick
//!
//! ## Usage
//!
//! ```ignore
//! systems::configure_duel_system_ordering(&mut app);
//! systems::add_core_duel_systems(&mut app, || true);
//! ```

use bevy::prelude::*;

use super::constants::ROUND_INTERMISSION_SECS;
use super::fighter::{FighterId, InputIntent};
use super::match_flow::MatchPhase;
use super::Duel;
use crate::combat::events::{FighterHitEvent, FighterLandedEvent, MatchFlowEvent, RoundEndedEvent};
use crate::keybindings::{GameAction, Keybindings};
use crate::settings::GameSettings;

/// Windowed duel: builds the `Duel` from `GameSettings` and drives it from
/// the keyboard.
pub struct DuelPlugin;

impl Plugin for DuelPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<GameSettings>()
            .cloned()
            .unwrap_or_default();

        let duel = Duel::new(
            settings.map.build(),
            settings.control_schemes(),
            settings.match_rules(),
        );
        info!(
            "Duel on {} (best of {}), p2 is {}",
            settings.map.name(),
            settings.best_of,
            if settings.player_two_computer {
                "the computer"
            } else {
                "a second player"
            }
        );

        app.insert_resource(duel);
        configure_duel_system_ordering(app);
        add_core_duel_systems(app, || true);
        add_keyboard_duel_systems(app);
    }
}

/// System set labels for duel system ordering.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DuelSystemPhase {
    /// Keyboard intents, pause and restart keys
    Input,
    /// The duel tick
    Simulation,
    /// Round intermission, logging, effects
    Resolution,
}

/// Configures the ordering between duel system phases.
///
/// Call this once during app setup before adding duel systems.
pub fn configure_duel_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            DuelSystemPhase::Input,
            DuelSystemPhase::Simulation,
            DuelSystemPhase::Resolution,
        )
            .chain(),
    );
}

/// Keyboard intents for p1 and p2, collected before the tick.
///
/// Fighters driven by a controller ignore their slot.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PendingIntents(pub [InputIntent; 2]);

/// Pause between a round ending and the next one starting.
#[derive(Resource, Debug, Clone)]
pub struct RoundIntermission {
    pub duration_secs: f32,
    remaining: Option<f32>,
}

impl Default for RoundIntermission {
    fn default() -> Self {
        Self::new(ROUND_INTERMISSION_SECS)
    }
}

impl RoundIntermission {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            remaining: None,
        }
    }

    /// Seconds until the next round, while an intermission is running
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Count down; returns true once the intermission has run out.
    fn tick(&mut self, dt_secs: f32) -> bool {
        let remaining = self.remaining.get_or_insert(self.duration_secs);
        *remaining -= dt_secs;
        if *remaining <= 0.0 {
            self.remaining = None;
            return true;
        }
        false
    }
}

/// Adds the systems that run the duel.
///
/// # Arguments
/// * `app` - The Bevy App to add systems to
/// * `run_condition` - A run condition (e.g., `|| true` for headless mode)
pub fn add_core_duel_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.init_resource::<PendingIntents>()
        .init_resource::<RoundIntermission>()
        .add_event::<FighterHitEvent>()
        .add_event::<FighterLandedEvent>()
        .add_event::<RoundEndedEvent>()
        .add_event::<MatchFlowEvent>();

    app.add_systems(
        Update,
        advance_duel
            .in_set(DuelSystemPhase::Simulation)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        run_round_intermission
            .in_set(DuelSystemPhase::Resolution)
            .run_if(run_condition),
    );
}

/// Adds keyboard-driven input and match controls (windowed mode only).
pub fn add_keyboard_duel_systems(app: &mut App) {
    app.add_systems(
        Update,
        (handle_match_controls, gather_keyboard_intents)
            .chain()
            .in_set(DuelSystemPhase::Input),
    );
}

// ============================================================================
// Input
// ============================================================================

/// Translate held keys into intents using each fighter's control scheme.
pub fn gather_keyboard_intents(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    duel: Res<Duel>,
    mut pending: ResMut<PendingIntents>,
) {
    pending.0 = [FighterId::P1, FighterId::P2]
        .map(|id| keybindings.intent_for(duel.fighter(id).control, &keyboard));
}

/// Pause, round restart and new match keys.
pub fn handle_match_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut duel: ResMut<Duel>,
    mut intermission: ResMut<RoundIntermission>,
    mut flow_events: EventWriter<MatchFlowEvent>,
) {
    if keybindings.action_just_pressed(GameAction::PausePlay, &keyboard) {
        let was_paused = duel.phase() == MatchPhase::Paused;
        if duel.toggle_pause() {
            flow_events.send(if was_paused {
                MatchFlowEvent::Resumed
            } else {
                MatchFlowEvent::Paused
            });
        }
    }

    if keybindings.action_just_pressed(GameAction::RestartRound, &keyboard)
        && duel.phase() == MatchPhase::Playing
    {
        duel.reset_round();
        info!("Round {} restarted", duel.state().round());
        flow_events.send(MatchFlowEvent::RoundStarted {
            round: duel.state().round(),
        });
    }

    if keybindings.action_just_pressed(GameAction::NewMatch, &keyboard) {
        duel.restart();
        intermission.cancel();
        flow_events.send(MatchFlowEvent::Restarted);
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Run the frame's single duel tick and publish what happened.
pub fn advance_duel(
    time: Res<Time>,
    mut duel: ResMut<Duel>,
    pending: Res<PendingIntents>,
    mut hit_events: EventWriter<FighterHitEvent>,
    mut landed_events: EventWriter<FighterLandedEvent>,
    mut round_events: EventWriter<RoundEndedEvent>,
) {
    let report = duel.tick(time.delta_secs() * 1000.0, pending.0);

    for hit in report.hits {
        hit_events.send(FighterHitEvent { hit });
    }

    for id in report.landings {
        let fighter = duel.fighter(id);
        let (x, _) = fighter.center();
        landed_events.send(FighterLandedEvent {
            fighter: id,
            x,
            y: fighter.body().bottom(),
        });
    }

    if let Some(outcome) = report.round_end {
        round_events.send(RoundEndedEvent { outcome });
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Start the next round once the intermission after a round has elapsed.
pub fn run_round_intermission(
    time: Res<Time>,
    mut duel: ResMut<Duel>,
    mut intermission: ResMut<RoundIntermission>,
    mut flow_events: EventWriter<MatchFlowEvent>,
) {
    if duel.phase() != MatchPhase::RoundOver {
        return;
    }

    if intermission.tick(time.delta_secs()) && duel.start_next_round() {
        flow_events.send(MatchFlowEvent::RoundStarted {
            round: duel.state().round(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intermission_counts_down_then_rearms() {
        let mut intermission = RoundIntermission::new(1.0);
        assert!(intermission.remaining().is_none());

        assert!(!intermission.tick(0.6));
        assert!(intermission.remaining().is_some());
        assert!(intermission.tick(0.6));
        assert!(intermission.remaining().is_none());

        // A later round end starts a fresh countdown
        assert!(!intermission.tick(0.5));
    }

    #[test]
    fn test_cancel_clears_countdown() {
        let mut intermission = RoundIntermission::new(2.0);
        intermission.tick(1.0);
        intermission.cancel();
        assert!(intermission.remaining().is_none());
    }
}
