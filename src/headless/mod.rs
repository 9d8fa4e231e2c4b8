//! Headless mode for automated matches
//!
//! This module runs duels without any graphical output, suitable for
//! automated testing and AI tuning.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless match
//! cargo run --release -- --headless match_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "p1": "Computer",
//!   "p2": "Idle",
//!   "map": "Classic",
//!   "best_of": 3,
//!   "round_duration_secs": 99,
//!   "max_duration_secs": 600,
//!   "tick_rate_hz": 60
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{ConfigError, HeadlessController, HeadlessMatchConfig};
pub use runner::{
    build_headless_app, run_headless_match, run_to_completion, FighterResult, MatchResult,
};
