//! Combat logging
//!
//! Records every hit, block and match flow event for display and post-match
//! analysis. Headless runs save the log as JSON together with match metadata.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::duel::{FighterId, HitEvent, RoundOutcome};

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since match start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Structured hit data for `Hit` and `Blocked` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit: Option<HitRecord>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Attack connected on an open defender
    Hit,
    /// Attack connected on a blocking defender
    Blocked,
    RoundStart,
    RoundOver,
    MatchOver,
    /// Pause or resume
    Pause,
    /// Any other match event (match start, restart)
    MatchEvent,
}

/// Structured data for a connected attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub attacker: FighterId,
    pub defender: FighterId,
    pub damage: u32,
    pub blocked: bool,
}

impl From<&HitEvent> for HitRecord {
    fn from(hit: &HitEvent) -> Self {
        Self {
            attacker: hit.attacker,
            defender: hit.defender,
            damage: hit.damage,
            blocked: hit.blocked,
        }
    }
}

/// Errors from writing a combat log to disk
#[derive(Debug, Error)]
pub enum LogSaveError {
    #[error("failed to serialize combat log: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug, Clone)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Drop everything from the previous match and open a new one.
    ///
    /// The match clock keeps running, so only the entries are cleared.
    pub fn start_new_match(&mut self) {
        self.entries.clear();
        self.log(CombatLogEventType::MatchEvent, "New match started".to_string());
        self.log(CombatLogEventType::RoundStart, "Round 1 begins".to_string());
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            hit: None,
        });
    }

    /// Record a connected attack
    pub fn log_hit(&mut self, hit: &HitEvent) {
        let (event_type, message) = if hit.blocked {
            (
                CombatLogEventType::Blocked,
                format!(
                    "{} blocks {}'s attack and takes {} damage",
                    hit.defender.as_str(),
                    hit.attacker.as_str(),
                    hit.damage
                ),
            )
        } else {
            (
                CombatLogEventType::Hit,
                format!(
                    "{} hits {} for {} damage",
                    hit.attacker.as_str(),
                    hit.defender.as_str(),
                    hit.damage
                ),
            )
        };

        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            hit: Some(HitRecord::from(hit)),
        });
    }

    /// Record the end of a round (and of the match, if it was decided)
    pub fn log_round_end(&mut self, outcome: &RoundOutcome) {
        let message = match outcome.winner {
            Some(winner) => format!(
                "Round {} over ({:?}): {} wins with {} health left",
                outcome.round,
                outcome.reason,
                winner.as_str(),
                outcome.final_health[winner.index()]
            ),
            None => format!("Round {} over ({:?}): draw", outcome.round, outcome.reason),
        };
        self.log(CombatLogEventType::RoundOver, message);

        if let Some(champion) = outcome.match_winner {
            self.log(
                CombatLogEventType::MatchOver,
                format!("Match over: {} wins", champion.as_str()),
            );
        }
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get only health-changing events (hits and blocked hits)
    pub fn hp_changes_only(&self) -> Vec<&CombatLogEntry> {
        self.entries.iter().filter(|e| e.hit.is_some()).collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    fn hits(&self) -> impl Iterator<Item = &HitRecord> {
        self.entries.iter().filter_map(|e| e.hit.as_ref())
    }

    // ==========================================================================
    // Aggregation
    // ==========================================================================

    /// Total damage dealt by a fighter, blocked hits included
    pub fn damage_dealt_by(&self, fighter: FighterId) -> u32 {
        self.hits()
            .filter(|h| h.attacker == fighter)
            .map(|h| h.damage)
            .sum()
    }

    /// Total damage taken by a fighter
    pub fn damage_taken_by(&self, fighter: FighterId) -> u32 {
        self.hits()
            .filter(|h| h.defender == fighter)
            .map(|h| h.damage)
            .sum()
    }

    /// Number of clean (unblocked) hits a fighter landed
    pub fn hits_landed_by(&self, fighter: FighterId) -> usize {
        self.hits()
            .filter(|h| h.attacker == fighter && !h.blocked)
            .count()
    }

    /// Number of attacks a fighter absorbed with a block
    pub fn blocks_by(&self, fighter: FighterId) -> usize {
        self.hits()
            .filter(|h| h.defender == fighter && h.blocked)
            .count()
    }

    /// Save the log and match metadata as pretty JSON.
    ///
    /// Without an explicit path the file goes to `match_logs/` with a
    /// timestamped name. Returns the path written.
    pub fn save_to_file(
        &self,
        metadata: &MatchMetadata,
        output_path: Option<&str>,
    ) -> Result<String, LogSaveError> {
        let path = match output_path {
            Some(path) => PathBuf::from(path),
            None => default_log_path(),
        };

        let saved = SavedCombatLog {
            metadata,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| LogSaveError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, json).map_err(|source| LogSaveError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path.display().to_string())
    }
}

fn default_log_path() -> PathBuf {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    Path::new("match_logs").join(format!("duel_{}.json", stamp))
}

#[derive(Serialize)]
struct SavedCombatLog<'a> {
    metadata: &'a MatchMetadata,
    entries: &'a [CombatLogEntry],
}

/// Per-fighter summary stored with a saved log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterMetadata {
    pub id: FighterId,
    /// Controller name ("keyboard", "reactive", "idle")
    pub controller: String,
    pub max_health: u32,
    pub final_health: u32,
    pub round_wins: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub final_position: (f32, f32),
}

/// Match-level summary stored with a saved log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub arena_name: String,
    pub best_of: u32,
    /// `None` for a draw or a timed-out match
    pub winner: Option<FighterId>,
    pub rounds: Vec<RoundOutcome>,
    pub fighters: Vec<FighterMetadata>,
}
