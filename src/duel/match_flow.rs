//! Match Flow
//!
//! Round clock, win conditions and best-of-N scoring:
//! - `Playing` ⇄ `Paused`
//! - `Playing` → `RoundOver` → `Playing` (next round)
//! - `Playing` → `MatchOver` once a side reaches the needed round wins
//!
//! Round results are returned as data. Presenting them is left to the UI.

use bevy::log::info;
use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_BEST_OF, ROUND_DURATION_SECS};
use super::fighter::FighterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    Playing,
    Paused,
    RoundOver,
    MatchOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    /// One fighter's health reached zero
    Knockout,
    /// Both fighters reached zero in the same tick
    DoubleKnockout,
    /// The round clock ran out
    TimeUp,
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    /// `None` for a draw
    pub winner: Option<FighterId>,
    pub reason: RoundEndReason,
    /// Health of p1 and p2 when the round ended
    pub final_health: [u32; 2],
    /// Set when this round decided the match
    pub match_winner: Option<FighterId>,
}

impl RoundOutcome {
    /// Health difference between the two fighters at the end of the round.
    pub fn margin(&self) -> u32 {
        self.final_health[0].abs_diff(self.final_health[1])
    }
}

/// Match rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
    /// Number of rounds in the match (best of N)
    pub best_of: u32,
    /// Length of a round in seconds
    pub round_duration_secs: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            best_of: DEFAULT_BEST_OF,
            round_duration_secs: ROUND_DURATION_SECS,
        }
    }
}

impl MatchRules {
    /// Round wins needed to take the match: `ceil(best_of / 2)`.
    pub fn wins_needed(&self) -> u32 {
        self.best_of.div_ceil(2).max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    rules: MatchRules,
    phase: MatchPhase,
    round: u32,
    time_remaining_secs: f32,
    wins: [u32; 2],
    last_outcome: Option<RoundOutcome>,
}

impl MatchState {
    pub fn new(rules: MatchRules) -> Self {
        Self {
            rules,
            phase: MatchPhase::Playing,
            round: 1,
            time_remaining_secs: rules.round_duration_secs,
            wins: [0, 0],
            last_outcome: None,
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn time_remaining_secs(&self) -> f32 {
        self.time_remaining_secs
    }

    pub fn wins(&self, fighter: FighterId) -> u32 {
        self.wins[fighter.index()]
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn match_winner(&self) -> Option<FighterId> {
        if self.phase != MatchPhase::MatchOver {
            return None;
        }
        self.last_outcome.and_then(|o| o.match_winner)
    }

    /// Run the round clock and check for the end of the round.
    ///
    /// Knockouts are checked before the clock, so a fighter reaching zero
    /// health on the same tick the timer expires is still a knockout.
    pub fn update(&mut self, dt_secs: f32, health: [u32; 2]) -> Option<RoundOutcome> {
        if self.phase != MatchPhase::Playing {
            return None;
        }

        self.time_remaining_secs = (self.time_remaining_secs - dt_secs).max(0.0);

        let (winner, reason) = match (health[0] == 0, health[1] == 0) {
            (true, true) => (None, RoundEndReason::DoubleKnockout),
            (true, false) => (Some(FighterId::P2), RoundEndReason::Knockout),
            (false, true) => (Some(FighterId::P1), RoundEndReason::Knockout),
            (false, false) if self.time_remaining_secs <= 0.0 => {
                let winner = match health[0].cmp(&health[1]) {
                    std::cmp::Ordering::Greater => Some(FighterId::P1),
                    std::cmp::Ordering::Less => Some(FighterId::P2),
                    std::cmp::Ordering::Equal => None,
                };
                (winner, RoundEndReason::TimeUp)
            }
            (false, false) => return None,
        };

        Some(self.finish_round(winner, reason, health))
    }

    fn finish_round(
        &mut self,
        winner: Option<FighterId>,
        reason: RoundEndReason,
        health: [u32; 2],
    ) -> RoundOutcome {
        let mut match_winner = None;
        if let Some(winner) = winner {
            self.wins[winner.index()] += 1;
            if self.wins[winner.index()] >= self.rules.wins_needed() {
                match_winner = Some(winner);
            }
        }

        self.phase = if match_winner.is_some() {
            MatchPhase::MatchOver
        } else {
            MatchPhase::RoundOver
        };

        let outcome = RoundOutcome {
            round: self.round,
            winner,
            reason,
            final_health: health,
            match_winner,
        };
        self.last_outcome = Some(outcome);

        match winner {
            Some(winner) => info!(
                "Round {} over ({:?}): {} wins, score {}-{}",
                self.round,
                reason,
                winner.name(),
                self.wins[0],
                self.wins[1]
            ),
            None => info!("Round {} over ({:?}): draw", self.round, reason),
        }
        if let Some(champion) = match_winner {
            info!("Match over! {} wins the match", champion.name());
        }

        outcome
    }

    /// Freeze the round. Only valid while playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != MatchPhase::Playing {
            return false;
        }
        self.phase = MatchPhase::Paused;
        info!("Round {} paused", self.round);
        true
    }

    /// Unfreeze a paused round.
    pub fn resume(&mut self) -> bool {
        if self.phase != MatchPhase::Paused {
            return false;
        }
        self.phase = MatchPhase::Playing;
        info!("Round {} resumed", self.round);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            MatchPhase::Playing => self.pause(),
            MatchPhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Move from `RoundOver` into the next round. Tallies are kept.
    pub fn start_next_round(&mut self) -> bool {
        if self.phase != MatchPhase::RoundOver {
            return false;
        }
        self.round += 1;
        self.reset_clock();
        self.phase = MatchPhase::Playing;
        info!("Round {} begins", self.round);
        true
    }

    /// Refill the round clock.
    pub fn reset_clock(&mut self) {
        self.time_remaining_secs = self.rules.round_duration_secs;
    }

    /// Start over from round one with no round wins.
    pub fn restart(&mut self) {
        *self = Self::new(self.rules);
        info!("New match started (best of {})", self.rules.best_of);
    }
}
