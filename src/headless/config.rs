//! JSON configuration parsing for headless mode
//!
//! Parses JSON match configurations and turns them into a ready-to-run `Duel`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::duel::{
    ArenaMap, ControlScheme, Duel, FighterId, IdleController, MatchRules, DEFAULT_BEST_OF,
    ROUND_DURATION_SECS,
};

/// Errors from loading or validating a headless configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown controller '{0}'. Valid controllers: Computer, Idle")]
    UnknownController(String),
    #[error("best_of must be at least 1")]
    InvalidBestOf,
    #[error("{field} must be a positive number of seconds, got {value}")]
    InvalidDuration { field: &'static str, value: f32 },
    #[error("tick_rate_hz must be between 1 and 1000, got {0}")]
    InvalidTickRate(u32),
}

/// Who drives a fighter in a headless match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessController {
    /// The reactive AI
    Computer,
    /// Never presses anything
    Idle,
}

/// Headless match configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessMatchConfig {
    /// Controller for p1 ("Computer" or "Idle")
    #[serde(default = "default_controller")]
    pub p1: String,
    /// Controller for p2 ("Computer" or "Idle")
    #[serde(default = "default_controller")]
    pub p2: String,
    /// Arena layout (default: Classic)
    #[serde(default)]
    pub map: ArenaMap,
    /// Number of rounds (best of N)
    #[serde(default = "default_best_of")]
    pub best_of: u32,
    /// Length of a round in simulated seconds
    #[serde(default = "default_round_duration")]
    pub round_duration_secs: f32,
    /// Simulated time after which the match is abandoned as a draw
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Fixed simulation rate
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
    /// Custom output path for match log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_controller() -> String {
    "Computer".to_string()
}

fn default_best_of() -> u32 {
    DEFAULT_BEST_OF
}

fn default_round_duration() -> f32 {
    ROUND_DURATION_SECS
}

fn default_max_duration() -> f32 {
    600.0
}

fn default_tick_rate() -> u32 {
    60
}

impl Default for HeadlessMatchConfig {
    fn default() -> Self {
        Self {
            p1: default_controller(),
            p2: default_controller(),
            map: ArenaMap::default(),
            best_of: default_best_of(),
            round_duration_secs: default_round_duration(),
            max_duration_secs: default_max_duration(),
            tick_rate_hz: default_tick_rate(),
            output_path: None,
        }
    }
}

impl HeadlessMatchConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: HeadlessMatchConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::parse_controller(&self.p1)?;
        Self::parse_controller(&self.p2)?;

        if self.best_of == 0 {
            return Err(ConfigError::InvalidBestOf);
        }

        for (field, value) in [
            ("round_duration_secs", self.round_duration_secs),
            ("max_duration_secs", self.max_duration_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }

        if !(1..=1000).contains(&self.tick_rate_hz) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate_hz));
        }

        Ok(())
    }

    /// Parse a controller name
    pub fn parse_controller(name: &str) -> Result<HeadlessController, ConfigError> {
        match name {
            "Computer" => Ok(HeadlessController::Computer),
            "Idle" => Ok(HeadlessController::Idle),
            _ => Err(ConfigError::UnknownController(name.to_string())),
        }
    }

    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            best_of: self.best_of,
            round_duration_secs: self.round_duration_secs,
        }
    }

    /// Length of one simulation step in seconds
    pub fn tick_secs(&self) -> f64 {
        1.0 / f64::from(self.tick_rate_hz.max(1))
    }

    /// Build the duel this configuration describes
    pub fn to_duel(&self) -> Result<Duel, ConfigError> {
        let controllers = [
            Self::parse_controller(&self.p1)?,
            Self::parse_controller(&self.p2)?,
        ];

        let mut duel = Duel::new(
            self.map.build(),
            [ControlScheme::Computer, ControlScheme::Computer],
            self.match_rules(),
        );
        for (id, controller) in [FighterId::P1, FighterId::P2].into_iter().zip(controllers) {
            if controller == HeadlessController::Idle {
                duel.set_controller(id, Box::new(IdleController));
            }
        }
        Ok(duel)
    }
}
