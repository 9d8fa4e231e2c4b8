//! Headless match execution
//!
//! Runs duels without any graphical output at a fixed simulation rate,
//! suitable for automated testing and balance checks.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::combat::events::RoundEndedEvent;
use crate::combat::log::{CombatLog, FighterMetadata, MatchMetadata};
use crate::combat::CombatPlugin;
use crate::duel::systems::{self, DuelSystemPhase};
use crate::duel::{Duel, FighterId, MatchPhase, RoundOutcome};

use super::config::{ConfigError, HeadlessMatchConfig};

/// Result of a completed headless match
///
/// This struct provides programmatic access to match results for testing and analysis.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The match winner, or None for a draw or timeout
    pub winner: Option<FighterId>,
    /// Whether the match hit `max_duration_secs` before being decided
    pub timed_out: bool,
    /// Total simulated time in seconds, intermissions included
    pub match_time: f32,
    /// Every finished round in order
    pub rounds: Vec<RoundOutcome>,
    /// p1 then p2
    pub fighters: [FighterResult; 2],
    /// Where the combat log was written, if it was saved
    pub log_path: Option<String>,
}

/// Statistics for a single fighter after the match
#[derive(Debug, Clone)]
pub struct FighterResult {
    pub id: FighterId,
    /// Controller name ("reactive", "idle")
    pub controller: String,
    /// Health at the end of the last round played
    pub final_health: u32,
    pub round_wins: u32,
    /// Total damage dealt during the match
    pub damage_dealt: u32,
    /// Total damage taken during the match
    pub damage_taken: u32,
    /// Unblocked hits landed
    pub hits_landed: usize,
}

/// Resource to track headless match state
#[derive(Resource)]
pub struct HeadlessMatchState {
    /// Maximum match duration before declaring a draw
    pub max_duration: f32,
    /// Elapsed simulated time
    pub elapsed_time: f32,
    /// Custom output path for match log
    pub output_path: Option<String>,
    pub arena_name: String,
    /// Write the combat log to disk when the match ends
    pub save_log: bool,
    /// Finished rounds, collected from round events
    pub rounds: Vec<RoundOutcome>,
    /// Whether the match has completed
    pub match_complete: bool,
    /// Match result (populated when match completes)
    pub result: Option<MatchResult>,
}

/// Plugin for headless match execution. Expects the `Duel` resource to be
/// inserted already.
pub struct HeadlessPlugin {
    pub config: HeadlessMatchConfig,
    pub save_log: bool,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HeadlessMatchState {
            max_duration: self.config.max_duration_secs,
            elapsed_time: 0.0,
            output_path: self.config.output_path.clone(),
            arena_name: self.config.map.name().to_string(),
            save_log: self.save_log,
            rounds: Vec::new(),
            match_complete: false,
            result: None,
        })
        // Every update advances the clock by exactly one tick
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            self.config.tick_secs(),
        )));

        systems::configure_duel_system_ordering(app);
        systems::add_core_duel_systems(app, || true);
        app.add_plugins(CombatPlugin);

        app.add_systems(
            Update,
            (
                headless_collect_rounds,
                headless_track_time,
                headless_check_match_end,
            )
                .chain()
                .after(DuelSystemPhase::Resolution),
        );
    }
}

fn headless_collect_rounds(
    mut round_events: EventReader<RoundEndedEvent>,
    mut headless_state: ResMut<HeadlessMatchState>,
) {
    for event in round_events.read() {
        headless_state.rounds.push(event.outcome);
    }
}

/// Track elapsed simulated time (used for timeout detection)
fn headless_track_time(time: Res<Time>, mut headless_state: ResMut<HeadlessMatchState>) {
    headless_state.elapsed_time += time.delta_secs();
}

/// Check if the match has been decided or has run out of time
fn headless_check_match_end(
    duel: Res<Duel>,
    combat_log: Res<CombatLog>,
    mut headless_state: ResMut<HeadlessMatchState>,
) {
    if headless_state.match_complete {
        return;
    }

    let decided = duel.phase() == MatchPhase::MatchOver;
    let timed_out = !decided && headless_state.elapsed_time >= headless_state.max_duration;
    if !decided && !timed_out {
        return;
    }

    let winner = duel.state().match_winner();
    match winner {
        Some(winner) => info!("Match ended! {} wins", winner.name()),
        None => info!(
            "Match timed out after {:.1}s - declaring DRAW",
            headless_state.elapsed_time
        ),
    }

    let mut result = build_match_result(&duel, &combat_log, &headless_state, timed_out);
    if headless_state.save_log {
        result.log_path = save_headless_match_log(&result, &duel, &combat_log, &headless_state);
    }

    headless_state.result = Some(result);
    headless_state.match_complete = true;
}

/// Build the MatchResult from the current duel state
fn build_match_result(
    duel: &Duel,
    combat_log: &CombatLog,
    headless_state: &HeadlessMatchState,
    timed_out: bool,
) -> MatchResult {
    let fighter_result = |id: FighterId| FighterResult {
        id,
        controller: duel.controller_name(id).unwrap_or("keyboard").to_string(),
        final_health: duel.fighter(id).health,
        round_wins: duel.state().wins(id),
        damage_dealt: combat_log.damage_dealt_by(id),
        damage_taken: combat_log.damage_taken_by(id),
        hits_landed: combat_log.hits_landed_by(id),
    };

    MatchResult {
        winner: duel.state().match_winner(),
        timed_out,
        match_time: headless_state.elapsed_time,
        rounds: headless_state.rounds.clone(),
        fighters: [fighter_result(FighterId::P1), fighter_result(FighterId::P2)],
        log_path: None,
    }
}

/// Save the combat log to a file
fn save_headless_match_log(
    result: &MatchResult,
    duel: &Duel,
    combat_log: &CombatLog,
    headless_state: &HeadlessMatchState,
) -> Option<String> {
    let fighters = result
        .fighters
        .iter()
        .map(|f| {
            let fighter = duel.fighter(f.id);
            FighterMetadata {
                id: f.id,
                controller: f.controller.clone(),
                max_health: fighter.max_health,
                final_health: f.final_health,
                round_wins: f.round_wins,
                damage_dealt: f.damage_dealt,
                damage_taken: f.damage_taken,
                final_position: (fighter.x, fighter.y),
            }
        })
        .collect();

    let metadata = MatchMetadata {
        arena_name: headless_state.arena_name.clone(),
        best_of: duel.state().rules().best_of,
        winner: result.winner,
        rounds: result.rounds.clone(),
        fighters,
    };

    match combat_log.save_to_file(&metadata, headless_state.output_path.as_deref()) {
        Ok(filename) => {
            info!("Combat log saved to {}", filename);
            Some(filename)
        }
        Err(e) => {
            error!("Failed to save combat log: {}", e);
            None
        }
    }
}

/// Build a windowless app that runs the configured duel.
///
/// Each `app.update()` advances the simulation by one fixed tick.
pub fn build_headless_app(config: HeadlessMatchConfig, save_log: bool) -> Result<App, ConfigError> {
    config.validate()?;
    let duel = config.to_duel()?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(duel)
        .add_plugins(HeadlessPlugin { config, save_log });
    Ok(app)
}

/// Step a headless app until the match is decided or times out
pub fn run_to_completion(app: &mut App) -> MatchResult {
    loop {
        app.update();
        if let Some(result) = app
            .world()
            .get_resource::<HeadlessMatchState>()
            .and_then(|state| state.result.clone())
        {
            return result;
        }
    }
}

/// Run a headless match with the given configuration and save its log
pub fn run_headless_match(config: HeadlessMatchConfig) -> Result<MatchResult, ConfigError> {
    println!("Starting headless duel simulation...");
    println!("  p1: {}", config.p1);
    println!("  p2: {}", config.p2);
    println!("  Map: {}", config.map.name());
    println!(
        "  Best of {} ({:.0}s rounds, {} Hz)",
        config.best_of, config.round_duration_secs, config.tick_rate_hz
    );
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    let mut app = build_headless_app(config, true)?;
    app.add_plugins(LogPlugin::default());
    let result = run_to_completion(&mut app);

    match result.winner {
        Some(winner) => println!(
            "Match complete in {:.1}s: {} wins ({}-{})",
            result.match_time,
            winner.name(),
            result.fighters[0].round_wins,
            result.fighters[1].round_wins
        ),
        None => println!("Match complete in {:.1}s: draw", result.match_time),
    }
    if let Some(path) = &result.log_path {
        println!("Log saved to: {}", path);
    }

    Ok(result)
}
