//! Command-line interface for Duelsim
//!
//! Supports both graphical (default) and headless modes.

use clap::Parser;
use std::path::PathBuf;

/// Two-fighter platform arena combat
#[derive(Parser, Debug)]
#[command(name = "duelsim")]
#[command(about = "Two-fighter platform arena combat simulation")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for match log (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum match duration in seconds (headless mode only)
    #[arg(long, value_name = "SECS")]
    pub max_duration: Option<f32>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_flags_parse() {
        let args = Args::try_parse_from([
            "duelsim",
            "--headless",
            "match.json",
            "--output",
            "out.json",
            "--max-duration",
            "120",
        ])
        .expect("valid args");
        assert_eq!(args.headless, Some(PathBuf::from("match.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.max_duration, Some(120.0));
    }

    #[test]
    fn test_no_flags_means_windowed() {
        let args = Args::try_parse_from(["duelsim"]).expect("valid args");
        assert!(args.headless.is_none());
        assert!(args.max_duration.is_none());
    }
}
