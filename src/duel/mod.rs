//! Duel simulation core
//!
//! Everything that decides the outcome of a fight lives here:
//! - `arena`: static platforms and world bounds
//! - `fighter`: per-fighter physics, input handling and combat timers
//! - `combat_core`: hit detection, damage, knockback and stun
//! - `combat_ai`: the computer opponent
//! - `match_flow`: round clock, pause and best-of-N scoring
//! - `systems`: the bevy systems that drive a `Duel` once per frame
//!
//! `Duel` is the single owner of both fighters, the arena, the match state and
//! the simulation clock. Each `tick` runs, in order: intents (keyboard or
//! computer), both fighter updates, both attacks against the same pre-hit
//! state, and finally the round checks.

pub mod arena;
pub mod combat_ai;
pub mod combat_core;
pub mod constants;
pub mod fighter;
pub mod match_flow;
pub mod systems;

use bevy::log::debug;
use bevy::prelude::Resource;
use smallvec::SmallVec;

pub use arena::{Arena, ArenaError, ArenaMap, Platform, Rect};
pub use combat_ai::{IdleController, IntentSource, ReactiveAi};
pub use combat_core::{attack_hitbox, is_in_range, resolve_exchange, try_attack, HitEvent};
pub use constants::*;
pub use fighter::{ControlScheme, Facing, Fighter, FighterId, FighterView, InputIntent};
pub use match_flow::{MatchPhase, MatchRules, MatchState, RoundEndReason, RoundOutcome};

/// Everything that happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub hits: SmallVec<[HitEvent; 2]>,
    /// Fighters that touched down this tick
    pub landings: SmallVec<[FighterId; 2]>,
    pub round_end: Option<RoundOutcome>,
}

/// Public match status for HUDs and headless reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuelStatus {
    pub phase: MatchPhase,
    pub round: u32,
    pub time_remaining_secs: f32,
    pub wins: [u32; 2],
    pub health: [u32; 2],
}

/// Validate a frame delta before it reaches the simulation.
///
/// Non-finite or negative deltas are rejected; long stalls are capped at
/// `MAX_FRAME_MS` so one hitch cannot skip a whole stun or attack window.
pub fn sanitize_frame_delta(dt_ms: f32) -> Option<f32> {
    if !dt_ms.is_finite() || dt_ms < 0.0 {
        return None;
    }
    Some(dt_ms.min(MAX_FRAME_MS))
}

/// The tick driver: two fighters on one arena under one match state.
#[derive(Resource)]
pub struct Duel {
    arena: Arena,
    fighters: [Fighter; 2],
    controllers: [Option<Box<dyn IntentSource>>; 2],
    state: MatchState,
    now_ms: f32,
}

impl Duel {
    /// Fighters using `ControlScheme::Computer` get the reactive AI.
    pub fn new(arena: Arena, controls: [ControlScheme; 2], rules: MatchRules) -> Self {
        let fighters = [
            Fighter::new(FighterId::P1, controls[0]),
            Fighter::new(FighterId::P2, controls[1]),
        ];
        let controllers = controls.map(|control| match control {
            ControlScheme::Computer => Some(Box::new(ReactiveAi) as Box<dyn IntentSource>),
            ControlScheme::Primary | ControlScheme::Secondary => None,
        });

        Self {
            arena,
            fighters,
            controllers,
            state: MatchState::new(rules),
            now_ms: 0.0,
        }
    }

    /// Hand a fighter over to a specific controller.
    pub fn set_controller(&mut self, id: FighterId, controller: Box<dyn IntentSource>) {
        self.fighters[id.index()].control = ControlScheme::Computer;
        self.controllers[id.index()] = Some(controller);
    }

    pub fn controller_name(&self, id: FighterId) -> Option<&str> {
        self.controllers[id.index()].as_deref().map(|c| c.name())
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn fighter(&self, id: FighterId) -> &Fighter {
        &self.fighters[id.index()]
    }

    pub fn fighter_mut(&mut self, id: FighterId) -> &mut Fighter {
        &mut self.fighters[id.index()]
    }

    pub fn fighters(&self) -> &[Fighter; 2] {
        &self.fighters
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase()
    }

    /// Current simulation time in milliseconds.
    pub fn now_ms(&self) -> f32 {
        self.now_ms
    }

    pub fn status(&self) -> DuelStatus {
        DuelStatus {
            phase: self.state.phase(),
            round: self.state.round(),
            time_remaining_secs: self.state.time_remaining_secs(),
            wins: [
                self.state.wins(FighterId::P1),
                self.state.wins(FighterId::P2),
            ],
            health: [self.fighters[0].health, self.fighters[1].health],
        }
    }

    /// Advance the simulation by one frame.
    ///
    /// `external` holds the keyboard intents for p1 and p2; fighters with a
    /// controller ignore theirs. Nothing happens unless the round is playing.
    pub fn tick(&mut self, dt_ms: f32, external: [InputIntent; 2]) -> TickReport {
        let mut report = TickReport::default();

        if self.state.phase() != MatchPhase::Playing {
            return report;
        }
        let Some(dt_ms) = sanitize_frame_delta(dt_ms) else {
            debug!("Rejected frame delta {}", dt_ms);
            return report;
        };

        self.now_ms += dt_ms;
        let now = self.now_ms;

        let views = [self.fighters[0].view(), self.fighters[1].view()];
        let intents = self.resolve_intents(external, &views, now);

        for (index, fighter) in self.fighters.iter_mut().enumerate() {
            fighter.update(dt_ms, &intents[index], &self.arena, Some(&views[1 - index]), now);
            if fighter.just_landed {
                report.landings.push(fighter.id);
            }
        }

        report.hits = resolve_exchange(
            &mut self.fighters,
            [intents[0].attack, intents[1].attack],
            now,
        );

        let health = [self.fighters[0].health, self.fighters[1].health];
        report.round_end = self.state.update(dt_ms / 1000.0, health);
        report
    }

    fn resolve_intents(
        &mut self,
        external: [InputIntent; 2],
        views: &[FighterView; 2],
        now: f32,
    ) -> [InputIntent; 2] {
        let mut intents = external;
        for (index, controller) in self.controllers.iter_mut().enumerate() {
            if let Some(controller) = controller {
                intents[index] = controller.decide(&views[index], &views[1 - index], now);
            }
        }
        intents
    }

    /// Put both fighters back on their spawns and refill the round clock.
    pub fn reset_round(&mut self) {
        for fighter in &mut self.fighters {
            fighter.reset();
        }
        self.state.reset_clock();
    }

    /// Continue from `RoundOver` into the next round.
    pub fn start_next_round(&mut self) -> bool {
        if !self.state.start_next_round() {
            return false;
        }
        for fighter in &mut self.fighters {
            fighter.reset();
        }
        true
    }

    /// Start a fresh match: round one, no round wins, fighters reset.
    pub fn restart(&mut self) {
        self.state.restart();
        for fighter in &mut self.fighters {
            fighter.reset();
        }
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state.toggle_pause()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1000.0 / 60.0;

    fn human_duel() -> Duel {
        Duel::new(
            ArenaMap::Classic.build(),
            [ControlScheme::Primary, ControlScheme::Secondary],
            MatchRules::default(),
        )
    }

    fn settle(duel: &mut Duel) {
        for _ in 0..5 {
            duel.tick(DT, [InputIntent::NONE; 2]);
        }
    }

    #[test]
    fn test_fighters_settle_and_face_each_other() {
        let mut duel = human_duel();
        settle(&mut duel);

        let p1 = duel.fighter(FighterId::P1);
        let p2 = duel.fighter(FighterId::P2);
        assert!(p1.on_ground && p2.on_ground);
        assert_eq!(p1.facing, Facing::Right);
        assert_eq!(p2.facing, Facing::Left);
    }

    #[test]
    fn test_attack_across_the_arena_misses() {
        let mut duel = human_duel();
        settle(&mut duel);

        let attack = InputIntent {
            attack: true,
            ..InputIntent::NONE
        };
        let report = duel.tick(DT, [attack, InputIntent::NONE]);

        assert!(report.hits.is_empty());
        assert_eq!(duel.fighter(FighterId::P2).health, MAX_HEALTH);
        assert!(duel.fighter(FighterId::P1).is_attacking);
    }

    #[test]
    fn test_close_attack_reports_hit() {
        let mut duel = human_duel();
        settle(&mut duel);
        duel.fighter_mut(FighterId::P2).x = 240.0;

        let attack = InputIntent {
            attack: true,
            ..InputIntent::NONE
        };
        let report = duel.tick(DT, [attack, InputIntent::NONE]);

        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].attacker, FighterId::P1);
        assert_eq!(duel.fighter(FighterId::P2).health, 85);
    }

    #[test]
    fn test_trading_blows_hurts_both_fighters() {
        let mut duel = human_duel();
        settle(&mut duel);
        duel.fighter_mut(FighterId::P2).x = 240.0;
        duel.tick(DT, [InputIntent::NONE; 2]);

        let attack = InputIntent {
            attack: true,
            ..InputIntent::NONE
        };
        let report = duel.tick(DT, [attack, attack]);

        assert_eq!(report.hits.len(), 2);
        assert_eq!(duel.status().health, [85, 85]);
    }

    #[test]
    fn test_paused_duel_does_not_move() {
        let mut duel = human_duel();
        settle(&mut duel);
        let before = duel.fighters().clone();
        let clock = duel.now_ms();

        assert!(duel.pause());
        let run = InputIntent {
            move_right: true,
            ..InputIntent::NONE
        };
        for _ in 0..10 {
            duel.tick(DT, [run, run]);
        }

        assert_eq!(duel.fighters(), &before);
        assert_eq!(duel.now_ms(), clock);
        assert!(duel.resume());
    }

    #[test]
    fn test_bad_frame_delta_is_rejected() {
        assert_eq!(sanitize_frame_delta(f32::NAN), None);
        assert_eq!(sanitize_frame_delta(-1.0), None);
        assert_eq!(sanitize_frame_delta(5000.0), Some(MAX_FRAME_MS));

        let mut duel = human_duel();
        let report = duel.tick(f32::INFINITY, [InputIntent::NONE; 2]);
        assert_eq!(report, TickReport::default());
        assert_eq!(duel.now_ms(), 0.0);
    }

    #[test]
    fn test_computer_controller_overrides_external_input() {
        let mut duel = Duel::new(
            ArenaMap::Flat.build(),
            [ControlScheme::Primary, ControlScheme::Computer],
            MatchRules::default(),
        );
        assert_eq!(duel.controller_name(FighterId::P2), Some("reactive"));
        settle(&mut duel);
        let start = duel.fighter(FighterId::P2).x;

        // Keyboard says "run right"; the computer walks left toward p1 instead
        let run_right = InputIntent {
            move_right: true,
            ..InputIntent::NONE
        };
        duel.tick(DT, [InputIntent::NONE, run_right]);
        assert!(duel.fighter(FighterId::P2).x < start);
    }

    #[test]
    fn test_next_round_resets_fighters_but_keeps_score() {
        let mut duel = human_duel();
        settle(&mut duel);
        duel.fighter_mut(FighterId::P2).health = 0;

        let report = duel.tick(DT, [InputIntent::NONE; 2]);
        let outcome = report.round_end.expect("knockout should end the round");
        assert_eq!(outcome.winner, Some(FighterId::P1));
        assert_eq!(duel.phase(), MatchPhase::RoundOver);

        assert!(duel.start_next_round());
        let status = duel.status();
        assert_eq!(status.round, 2);
        assert_eq!(status.wins, [1, 0]);
        assert_eq!(status.health, [MAX_HEALTH, MAX_HEALTH]);
        assert_eq!(status.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_reset_round_twice_matches_once() {
        let mut duel = human_duel();
        settle(&mut duel);
        duel.fighter_mut(FighterId::P1).take_damage(45);
        duel.fighter_mut(FighterId::P2).apply_stun(10_000.0);

        duel.reset_round();
        let once = duel.fighters().clone();
        duel.reset_round();

        assert_eq!(duel.fighters(), &once);
        assert_eq!(duel.status().time_remaining_secs, ROUND_DURATION_SECS);
    }
}
